use chrono::{DateTime, Utc};
use thiserror::Error;

/// Business errors for invitation management
#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("a user with this email already exists")]
    UserAlreadyExists,
    #[error("a pending invitation for this email already exists (expires {expires_at}); resend it instead")]
    AlreadyInvited { expires_at: DateTime<Utc> },
    #[error("invitation not found")]
    NotFound,
    #[error("invitation was already used")]
    AlreadyUsed,
    #[error("invitation has expired")]
    Expired,
    #[error("repository error: {0}")]
    Repository(String),
}
