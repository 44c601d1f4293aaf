use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use models::invitation::{self, Model as Invitation};
use models::user::Role;

use crate::invitation::errors::InvitationError;
use crate::invitation::repository::InvitationRepository;

pub struct SeaOrmInvitationRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl InvitationRepository for SeaOrmInvitationRepository {
    async fn user_email_exists(&self, email: &str) -> Result<bool, InvitationError> {
        let found = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| InvitationError::Repository(e.to_string()))?;
        Ok(found.is_some())
    }

    async fn find_pending_by_email(&self, email: &str) -> Result<Option<Invitation>, InvitationError> {
        invitation::find_pending_by_email(&self.db, email)
            .await
            .map_err(|e| InvitationError::Repository(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>, InvitationError> {
        invitation::find_by_id(&self.db, id)
            .await
            .map_err(|e| InvitationError::Repository(e.to_string()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>, InvitationError> {
        invitation::find_by_code(&self.db, code)
            .await
            .map_err(|e| InvitationError::Repository(e.to_string()))
    }

    async fn insert(
        &self,
        email: &str,
        code: &str,
        role: Role,
        invited_by: Option<Uuid>,
        expires_at: DateTime<Utc>,
    ) -> Result<Invitation, InvitationError> {
        invitation::create(&self.db, email, code, role, invited_by, expires_at)
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Validation(msg) => InvitationError::Validation(msg),
                other => InvitationError::Repository(other.to_string()),
            })
    }

    async fn delete(&self, id: Uuid) -> Result<(), InvitationError> {
        invitation::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InvitationError::Repository(e.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Invitation>, InvitationError> {
        invitation::list(&self.db)
            .await
            .map_err(|e| InvitationError::Repository(e.to_string()))
    }
}
