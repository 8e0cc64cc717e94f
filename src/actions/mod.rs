//! AJAX-style action dispatch
//!
//! Handlers are registered by name in an [`ActionRegistry`]. Every request
//! must carry a valid nonce; failures of any kind come back as an error
//! [`Envelope`] rather than an `Err`.

mod envelope;
mod handlers;
mod nonce;
mod request;

pub use envelope::Envelope;
pub use handlers::{
    CheckUsageHandler, FindPostsHandler, RecordScanHandler, SaveSettingsHandler, CHECK_USAGE,
    FIND_POSTS, RECORD_SCAN, SAVE_SETTINGS,
};
pub use nonce::{site_secret, NonceVerifier, NONCE_ACTION};
pub use request::ActionRequest;

use crate::core::{EditLinks, PostTypeLabels};
use crate::store::SiteStore;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything a handler may touch while serving one request
pub struct ActionContext<'a> {
    pub store: &'a SiteStore,
    pub labels: &'a PostTypeLabels,
    pub links: EditLinks,
    pub find_limit: usize,
    /// Request time, Unix seconds
    pub now: i64,
}

/// Trait for a named action
pub trait ActionHandler {
    fn handle(&self, ctx: &ActionContext<'_>, request: &ActionRequest) -> Envelope;
}

/// Action name to handler mapping
#[derive(Default)]
pub struct ActionRegistry {
    handlers: BTreeMap<String, Box<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Registry with the four built-in actions
    pub fn with_default_actions() -> Self {
        let mut registry = Self::default();
        registry.register(FIND_POSTS, Box::new(FindPostsHandler));
        registry.register(CHECK_USAGE, Box::new(CheckUsageHandler));
        registry.register(RECORD_SCAN, Box::new(RecordScanHandler));
        registry.register(SAVE_SETTINGS, Box::new(SaveSettingsHandler));
        registry
    }

    pub fn register(&mut self, name: &str, handler: Box<dyn ActionHandler>) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Verify the nonce and run the named handler
    pub fn dispatch(
        &self,
        ctx: &ActionContext<'_>,
        verifier: &NonceVerifier,
        request: &ActionRequest,
    ) -> Envelope {
        let Some(handler) = self.handlers.get(&request.action) else {
            debug!(
                action = %request.action,
                known = ?self.names().collect::<Vec<_>>(),
                "unknown action"
            );
            return Envelope::error("Unknown action.");
        };

        let nonce = request.param("nonce").unwrap_or_default();
        if !verifier.verify(&nonce, NONCE_ACTION, ctx.now) {
            debug!(action = %request.action, "rejected request with invalid nonce");
            return Envelope::error("Invalid security token.");
        }

        handler.handle(ctx, request)
    }
}
