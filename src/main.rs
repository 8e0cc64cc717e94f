//! block-usage - Block usage detection for WordPress content
//!
//! Enumerates registered blocks and reports whether and where each one
//! appears in published content, caching per-block counts and flagging
//! the cache as stale when content changes after a scan.

mod actions;
mod cli;
mod config;
mod core;
mod error;
mod export;
mod lifecycle;
mod registry;
mod report;
mod store;

use actions::{
    site_secret, ActionContext, ActionRegistry, ActionRequest, NonceVerifier, NONCE_ACTION,
};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command, KeepDataArg};
use config::Config;
use crate::core::{search_token, BatchOrchestrator, EditLinks, PostFinder, UsageScanner};
use error::{Result, UsageError};
use export::{create_exporter, Report};
use lifecycle::{KeepData, LifecycleHooks, UninstallOutcome};
use registry::BlockRegistry;
use report::{BlockListing, StatusReport};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;
use std::time::Duration;
use store::{Post, SiteStore};
use tracing::{warn, Level};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Convert to config
    let config = match cli.to_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match run(&cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Log to stderr; RUST_LOG overrides the default level
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(command: &Command, config: &Config) -> Result<ExitCode> {
    // Progress callback for status messages
    let progress = |msg: &str| {
        eprintln!("{}", msg);
    };

    // === Phase 1: Load registry and open the site database ===
    let registry = BlockRegistry::load(config.registry_path.as_deref())?;
    let store = SiteStore::open(config)?;
    let hooks = LifecycleHooks::new(&store);
    let now = Utc::now().timestamp();
    let links = EditLinks {
        admin_url: config.admin_base(),
        theme: config.theme.clone(),
    };

    let exporter = create_exporter(config.output_format);
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let mut exit = ExitCode::SUCCESS;

    // === Phase 2: Run the command ===
    match command {
        Command::Blocks => {
            let listing = BlockListing::build(&registry, &store)?;
            exporter.export(&Report::Blocks(&listing), &mut writer)?;
        }
        Command::Scan { filter, .. } => {
            progress(&format!(
                "Scanning {} blocks in batches of {}",
                registry.blocks().len(),
                config.batch_size
            ));
            let scanner = UsageScanner::new(&store, registry.labels());
            let orchestrator = BatchOrchestrator::new(
                config.batch_size,
                Duration::from_millis(config.batch_delay_ms),
            );
            let summary = orchestrator.run(registry.blocks(), &scanner, &hooks, &progress)?;
            exporter.export(&Report::Scan(&summary, (*filter).into()), &mut writer)?;
        }
        Command::Check { block, pattern } => {
            let token = pattern.as_deref().unwrap_or_default();
            let usage = UsageScanner::new(&store, registry.labels()).check(block, token);
            exporter.export(&Report::Usage(&usage), &mut writer)?;
        }
        Command::Find { block, pattern, .. } => {
            let token = pattern
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| search_token(block));
            let posts =
                PostFinder::new(&store, registry.labels(), &links, config.find_limit).find(token);
            exporter.export(
                &Report::Posts {
                    block_name: block,
                    search_pattern: token,
                    posts: &posts,
                },
                &mut writer,
            )?;
        }
        Command::Ajax { action, params } => {
            let request = ActionRequest::from_pairs(action, params)?;
            let ctx = ActionContext {
                store: &store,
                labels: registry.labels(),
                links,
                find_limit: config.find_limit,
                now,
            };
            let verifier = nonce_verifier(config, &store)?;
            let envelope = ActionRegistry::with_default_actions().dispatch(&ctx, &verifier, &request);
            if let Some(message) = envelope.error_message() {
                warn!(action = %request.action, reason = message, "action failed");
                exit = ExitCode::from(1);
            }
            writeln!(writer, "{}", serde_json::to_string(&envelope)?)?;
        }
        Command::Nonce => {
            let nonce = nonce_verifier(config, &store)?.create(NONCE_ACTION, now)?;
            writeln!(writer, "{}", nonce)?;
        }
        Command::Settings { keep_data } => {
            let keep_data = match keep_data {
                KeepDataArg::Yes => KeepData::Yes,
                KeepDataArg::No => KeepData::No,
            };
            hooks.save_settings(keep_data.as_str())?;
            writeln!(writer, "Settings saved.")?;
        }
        Command::Status => {
            let status = StatusReport::build(&store)?;
            exporter.export(&Report::Status(&status), &mut writer)?;
        }
        Command::Activate => {
            hooks.activated(now)?;
            writeln!(writer, "Activation recorded.")?;
        }
        Command::Deactivate => {
            hooks.deactivated(now)?;
            writeln!(writer, "Deactivation recorded.")?;
        }
        Command::Uninstall => match hooks.uninstall()? {
            UninstallOutcome::Kept => writeln!(writer, "Usage data kept.")?,
            UninstallOutcome::Removed => writeln!(writer, "Usage data and settings removed.")?,
        },
        Command::Import { file } => {
            let posts = load_posts(file)?;
            let mut changed = 0usize;
            for post in &posts {
                store.upsert_post(post)?;
                if hooks.post_saved(post, now)? {
                    changed += 1;
                }
            }
            progress(&format!(
                "Imported {} posts ({} content changes)",
                posts.len(),
                changed
            ));
        }
    }

    writer.flush()?;
    Ok(exit)
}

/// Verifier for the configured secret, or the site's stored one
fn nonce_verifier(config: &Config, store: &SiteStore) -> Result<NonceVerifier> {
    let secret = match &config.secret {
        Some(secret) => secret.clone(),
        None => site_secret(store)?,
    };
    Ok(NonceVerifier::new(secret))
}

/// Read a JSON array of posts
fn load_posts(path: &std::path::Path) -> Result<Vec<Post>> {
    let file = File::open(path).map_err(|e| UsageError::FileNotFound {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
