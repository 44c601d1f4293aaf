use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::user::Role;
use service::auth::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{verify_token, AuthConfig, AuthService};
use service::invitation::mailer::Mailer;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub mailer: Arc<dyn Mailer>,
    pub registration_base_url: String,
    pub uploads_dir: String,
}

/// Authenticated caller, extracted from the verified bearer token and
/// stashed in request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins and editors may mutate records; viewers are read-only.
    pub fn ensure_can_write(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Admin | Role::Editor => Ok(()),
            Role::Viewer => Err(ApiError::Forbidden("viewers cannot modify records".into())),
        }
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("missing or invalid token".into()))
    }
}

pub fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: state.db.clone() }),
        AuthConfig {
            jwt_secret: state.auth.jwt_secret.clone(),
            token_ttl_hours: state.auth.token_ttl_hours,
        },
    )
}

fn is_public(path: &str, method: &Method) -> bool {
    path == "/health"
        || path == "/auth/login"
        || path == "/auth/register"
        || path.starts_with("/invitations/validate/")
        || path.starts_with("/uploads/")
        || *method == Method::OPTIONS
}

/// Global middleware: everything outside the public surface requires a
/// valid `Authorization: Bearer <token>` header. The verified identity is
/// injected into request extensions for handlers and the admin gate.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    if is_public(&path, req.method()) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    let claims = verify_token(&token, &state.auth.jwt_secret)
        .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))?;
    let id = Uuid::parse_str(&claims.uid)
        .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))?;
    let role = Role::from_str(&claims.role)
        .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))?;

    req.extensions_mut().insert(CurrentUser { id, email: claims.sub, role });
    Ok(next.run(req).await)
}

/// Route-group gate for administrative endpoints. Runs after the bearer
/// middleware, so the extension is already present for valid requests.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    if !user.is_admin() {
        return Err(ApiError::Forbidden("administrator role required".into()));
    }
    Ok(next.run(req).await)
}

pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<AuthSession>, ApiError> {
    let session = auth_service(&state).login(input).await?;
    Ok(Json(session))
}

pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let session = auth_service(&state).register(input).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> Result<Json<AuthUser>, ApiError> {
    let user = models::user::find_by_id(&state.db, current.id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("account no longer active".into()))?;
    Ok(Json(AuthUser {
        id: user.id,
        email: user.email,
        username: user.username,
        role: user.role,
        is_active: user.is_active,
    }))
}
