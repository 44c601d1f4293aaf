use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invitation code is invalid or already used")]
    InvalidInvitation,
    #[error("invitation has expired")]
    InvitationExpired,
    #[error("email does not match the invitation")]
    EmailMismatch,
    #[error("user already exists")]
    Conflict,
    #[error("missing or invalid token")]
    Unauthorized,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}
