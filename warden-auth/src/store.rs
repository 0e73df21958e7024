use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The user descriptor handed to request handlers after a token passed all
/// checks. Without a revocation store it is synthesized from the token's
/// own claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub data: Option<Map<String, Value>>,
}

#[derive(Error, Debug)]
pub enum RevocationError {
    #[error("token has been revoked")]
    Revoked,
    #[error("revocation store is unavailable")]
    Unavailable(#[source] anyhow::Error),
}

/// A pluggable authority over token liveness, consulted during validation.
///
/// Implementations may consult a table of logouts, a password-changed-after
/// timestamp, or a probabilistic set of revoked token IDs; they own their
/// concurrency and may block on I/O.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Check whether the token identified by `token_id` (issued at
    /// `issued_at`, unix seconds) is still valid, and return the user it
    /// belongs to.
    async fn check(&self, token_id: &str, issued_at: i64) -> Result<UserInfo, RevocationError>;

    /// Mark a token as no longer valid. Typically called when a user logs
    /// out or an authorization ends.
    async fn revoke(&self, token_id: &str) -> Result<(), RevocationError>;
}
