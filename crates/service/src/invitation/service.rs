use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::invitation::{Model as Invitation, Status};
use models::user::Role;

use super::errors::InvitationError;
use super::mailer::Mailer;
use super::repository::InvitationRepository;

const CODE_LEN: usize = 40;
const EXPIRY_DAYS: i64 = 7;

/// Invitation as surfaced to clients: row fields plus the derived status.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationView {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub status: Status,
    pub invited_by: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<Invitation> for InvitationView {
    fn from(i: Invitation) -> Self {
        let status = i.status();
        Self {
            id: i.id,
            email: i.email,
            role: i.role,
            status,
            invited_by: i.invited_by,
            expires_at: i.expires_at.into(),
            created_at: i.created_at.into(),
        }
    }
}

/// What a public code lookup reveals: just enough to prefill the
/// registration form.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedInvitation {
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

pub struct InvitationService<R: InvitationRepository> {
    repo: Arc<R>,
    mailer: Arc<dyn Mailer>,
    registration_base_url: String,
}

fn generate_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LEN)
        .map(char::from)
        .collect()
}

impl<R: InvitationRepository> InvitationService<R> {
    pub fn new(repo: Arc<R>, mailer: Arc<dyn Mailer>, registration_base_url: String) -> Self {
        Self { repo, mailer, registration_base_url }
    }

    fn registration_link(&self, code: &str) -> String {
        format!("{}/register?code={}", self.registration_base_url.trim_end_matches('/'), code)
    }

    /// Issue a new invitation and dispatch the registration email.
    ///
    /// Rejected when the email already belongs to a user, or when a
    /// pending non-expired invitation for it exists (the caller should
    /// resend that one instead). Mail failure is logged but does not void
    /// the invitation.
    #[instrument(skip(self), fields(email = %email, role = %role.as_str()))]
    pub async fn send(
        &self,
        email: &str,
        role: Role,
        invited_by: Option<Uuid>,
    ) -> Result<InvitationView, InvitationError> {
        models::user::validate_email(email).map_err(|e| InvitationError::Validation(e.to_string()))?;
        if self.repo.user_email_exists(email).await? {
            return Err(InvitationError::UserAlreadyExists);
        }
        if let Some(pending) = self.repo.find_pending_by_email(email).await? {
            return Err(InvitationError::AlreadyInvited { expires_at: pending.expires_at.into() });
        }

        let code = generate_code();
        let expires_at = Utc::now() + Duration::days(EXPIRY_DAYS);
        let invitation = self.repo.insert(email, &code, role, invited_by, expires_at).await?;

        let link = self.registration_link(&code);
        if let Err(e) = self.mailer.send_invitation(&invitation.email, &code, role, &link).await {
            warn!(error = %e, email = %invitation.email, "invitation mail dispatch failed");
        }
        info!(invitation_id = %invitation.id, "invitation_sent");
        Ok(invitation.into())
    }

    /// Re-send the notification for an existing pending invitation.
    #[instrument(skip(self))]
    pub async fn resend(&self, id: Uuid) -> Result<InvitationView, InvitationError> {
        let invitation = self.repo.find_by_id(id).await?.ok_or(InvitationError::NotFound)?;
        match invitation.status() {
            Status::Used => return Err(InvitationError::AlreadyUsed),
            Status::Expired => return Err(InvitationError::Expired),
            Status::Pending => {}
        }
        let link = self.registration_link(&invitation.code);
        if let Err(e) = self
            .mailer
            .send_invitation(&invitation.email, &invitation.code, invitation.role, &link)
            .await
        {
            warn!(error = %e, email = %invitation.email, "invitation mail dispatch failed");
        }
        info!(invitation_id = %invitation.id, "invitation_resent");
        Ok(invitation.into())
    }

    /// Delete a pending (or already expired) invitation. Used invitations
    /// are kept as the registration audit trail.
    #[instrument(skip(self))]
    pub async fn revoke(&self, id: Uuid) -> Result<(), InvitationError> {
        let invitation = self.repo.find_by_id(id).await?.ok_or(InvitationError::NotFound)?;
        if invitation.status() == Status::Used {
            return Err(InvitationError::AlreadyUsed);
        }
        self.repo.delete(id).await?;
        info!(invitation_id = %id, "invitation_revoked");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<InvitationView>, InvitationError> {
        let rows = self.repo.list().await?;
        Ok(rows.into_iter().map(InvitationView::from).collect())
    }

    /// Public pre-registration lookup by code.
    pub async fn validate(&self, code: &str) -> Result<ValidatedInvitation, InvitationError> {
        let invitation = self.repo.find_by_code(code).await?.ok_or(InvitationError::NotFound)?;
        match invitation.status() {
            Status::Used => Err(InvitationError::AlreadyUsed),
            Status::Expired => Err(InvitationError::Expired),
            Status::Pending => Ok(ValidatedInvitation {
                email: invitation.email,
                role: invitation.role,
                expires_at: invitation.expires_at.into(),
            }),
        }
    }
}
