use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::Role;

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Invitation-gated registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub code: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Domain user (business view, never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
}

/// Pending invitation as the auth flow sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationTicket {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_used: bool,
    pub invited_by: Option<Uuid>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Login/registration result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}
