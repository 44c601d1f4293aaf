use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Authenticate a user against the stored argon2 hash and issue a token.
    /// Deactivated accounts are rejected the same way as bad credentials.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("email and password required".into()));
        }
        let user = self
            .repo
            .find_user_by_email(input.email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !user.is_active {
            debug!(user_id = %user.id, "login attempt on deactivated account");
            return Err(AuthError::InvalidCredentials);
        }

        let hash = self
            .repo
            .get_password_hash(user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let parsed = PasswordHash::new(&hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, email = %user.email, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Register a new account through an invitation code.
    ///
    /// The invitation must exist, be unused, unexpired, and issued for the
    /// submitted email. Consumption and account creation happen atomically
    /// in the repository; any failure leaves the invitation unconsumed.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        if input.username.trim().is_empty() {
            return Err(AuthError::Validation("username required".into()));
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password too short (>={MIN_PASSWORD_LEN})"
            )));
        }
        models::user::validate_email(&input.email)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let invitation = self
            .repo
            .find_invitation_by_code(input.code.trim())
            .await?
            .ok_or(AuthError::InvalidInvitation)?;
        if invitation.is_used {
            return Err(AuthError::InvalidInvitation);
        }
        if Utc::now() > invitation.expires_at {
            return Err(AuthError::InvitationExpired);
        }
        if !invitation.email.eq_ignore_ascii_case(input.email.trim()) {
            return Err(AuthError::EmailMismatch);
        }
        if self.repo.find_user_by_email(input.email.trim()).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self
            .repo
            .consume_invitation_and_create_user(
                invitation.id,
                input.email.trim(),
                input.username.trim(),
                &hash,
                invitation.role,
                invitation.invited_by,
            )
            .await?;

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, email = %user.email, role = %user.role.as_str(), "user_registered");
        Ok(AuthSession { user, token })
    }

    /// Resolve the current user from verified token claims.
    pub async fn profile(&self, claims: &Claims) -> Result<AuthUser, AuthError> {
        let uid = claims
            .uid
            .parse()
            .map_err(|_| AuthError::Unauthorized)?;
        let user = self
            .repo
            .find_user_by_id(uid)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            return Err(AuthError::Unauthorized);
        }
        Ok(user)
    }

    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::hours(self.cfg.token_ttl_hours);
        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id.to_string(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };
        encode(
            &JwtHeader::default(),
            &claims,
            &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

/// Decode and validate a bearer token. Standalone so middleware can verify
/// without a repository.
pub fn verify_token(token: &str, jwt_secret: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::Unauthorized)
}
