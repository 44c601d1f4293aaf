//! Invitation endpoints. Admin-only, except the public code validation
//! used by the registration form.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use models::user::Role;
use service::invitation::repo::seaorm::SeaOrmInvitationRepository;
use service::invitation::service::{InvitationService, InvitationView, ValidatedInvitation};

use crate::errors::ApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct SendInvitation {
    pub email: String,
    pub role: Role,
}

fn invitation_service(state: &ServerState) -> InvitationService<SeaOrmInvitationRepository> {
    InvitationService::new(
        Arc::new(SeaOrmInvitationRepository { db: state.db.clone() }),
        state.mailer.clone(),
        state.registration_base_url.clone(),
    )
}

pub async fn send(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(input): Json<SendInvitation>,
) -> Result<(StatusCode, Json<InvitationView>), ApiError> {
    let view = invitation_service(&state)
        .send(&input.email, input.role, Some(current.id))
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<InvitationView>>, ApiError> {
    Ok(Json(invitation_service(&state).list().await?))
}

pub async fn resend(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvitationView>, ApiError> {
    Ok(Json(invitation_service(&state).resend(id).await?))
}

pub async fn revoke(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    invitation_service(&state).revoke(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public lookup the registration form calls before submitting.
pub async fn validate(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Json<ValidatedInvitation>, ApiError> {
    Ok(Json(invitation_service(&state).validate(&code).await?))
}
