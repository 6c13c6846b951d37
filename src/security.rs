//! Feature-scoped security tokens.
//!
//! A token is a truncated SHA-256 over the server secret, the action it is
//! scoped to and the current time tick. A tick lasts half the configured
//! lifetime and a token is accepted for its own tick and the next one, so a
//! freshly issued token stays valid for at least half the lifetime.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Action scope of the company lookup endpoints.
pub const LOOKUP_ACTION: &str = "company_lookup";

const TOKEN_LEN: usize = 20;

#[derive(Clone)]
pub struct SecurityTokens {
    secret: String,
    lifetime_secs: u64,
}

impl SecurityTokens {
    pub fn new(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs: lifetime_secs.max(2),
        }
    }

    fn tick_len(&self) -> i64 {
        (self.lifetime_secs / 2) as i64
    }

    /// Minimum time a freshly issued token stays valid.
    pub fn guaranteed_validity_secs(&self) -> u64 {
        self.lifetime_secs / 2
    }

    fn tick(&self, now: DateTime<Utc>) -> i64 {
        // ceil(now / tick_len)
        let tick_len = self.tick_len();
        (now.timestamp() + tick_len - 1).div_euclid(tick_len)
    }

    fn token_for(&self, action: &str, tick: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b"|");
        hasher.update(action.as_bytes());
        hasher.update(b"|");
        hasher.update(tick.to_string().as_bytes());
        let mut token = hex::encode(hasher.finalize());
        token.truncate(TOKEN_LEN);
        token
    }

    pub fn issue(&self, action: &str) -> String {
        self.issue_at(action, Utc::now())
    }

    pub fn issue_at(&self, action: &str, now: DateTime<Utc>) -> String {
        self.token_for(action, self.tick(now))
    }

    pub fn verify(&self, token: &str, action: &str) -> bool {
        self.verify_at(token, action, Utc::now())
    }

    /// Accepts tokens from the current or the previous tick.
    pub fn verify_at(&self, token: &str, action: &str, now: DateTime<Utc>) -> bool {
        if token.is_empty() {
            return false;
        }
        let tick = self.tick(now);
        [tick, tick - 1]
            .iter()
            .any(|&t| constant_time_compare(token, &self.token_for(action, t)))
    }
}

/// Constant-time string comparison
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
