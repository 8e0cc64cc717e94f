//! Time-limited security tokens
//!
//! A nonce is an HMAC-SHA256 over a 12-hour tick and the nonce action,
//! keyed by a site secret and truncated to 10 hex digits. Tokens from the
//! current and the previous tick are accepted, so a token lives between
//! 12 and 24 hours.

use crate::error::{Result, UsageError};
use crate::store::{OptionsStore, NONCE_SECRET};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::info;

type HmacSha256 = Hmac<Sha256>;

/// Action every request nonce is minted for
pub const NONCE_ACTION: &str = "block_usage_nonce";

/// Half a day
const TICK_SECONDS: i64 = 43_200;

/// Hex digits kept from the MAC
const NONCE_LEN: usize = 10;

/// Random bytes in a generated site secret
const SECRET_BYTES: usize = 32;

/// The secret stored for this site, generated on first use
pub fn site_secret(options: &impl OptionsStore) -> Result<String> {
    if let Some(secret) = options.get_option(NONCE_SECRET)? {
        if !secret.is_empty() {
            return Ok(secret);
        }
    }

    let bytes: [u8; SECRET_BYTES] = rand::random();
    let secret = hex::encode(bytes);
    options.update_option(NONCE_SECRET, &secret)?;
    info!("generated site secret");
    Ok(secret)
}

/// Creates and checks nonces for one secret
#[derive(Clone)]
pub struct NonceVerifier {
    secret: Vec<u8>,
}

impl NonceVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn tick(now: i64) -> i64 {
        // ceil(now / TICK_SECONDS)
        -((-now).div_euclid(TICK_SECONDS))
    }

    fn mac(&self, action: &str, tick: i64) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| UsageError::InvalidConfig(format!("unusable nonce secret: {}", e)))?;
        mac.update(tick.to_string().as_bytes());
        mac.update(b"|");
        mac.update(action.as_bytes());
        Ok(mac)
    }

    pub fn create(&self, action: &str, now: i64) -> Result<String> {
        let digest = self.mac(action, Self::tick(now))?.finalize().into_bytes();
        let mut nonce = hex::encode(digest);
        nonce.truncate(NONCE_LEN);
        Ok(nonce)
    }

    pub fn verify(&self, nonce: &str, action: &str, now: i64) -> bool {
        if nonce.len() != NONCE_LEN {
            return false;
        }
        let Ok(tag) = hex::decode(nonce.to_ascii_lowercase()) else {
            return false;
        };

        let tick = Self::tick(now);
        [tick, tick - 1].into_iter().any(|t| {
            self.mac(action, t)
                .map(|mac| mac.verify_truncated_left(&tag).is_ok())
                .unwrap_or(false)
        })
    }
}
