use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use models::user::Role;

use crate::auth::domain::{AuthUser, InvitationTicket};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser {
        id: u.id,
        email: u.email,
        username: u.username,
        role: u.role,
        is_active: u.is_active,
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_id(&self.db, id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>, AuthError> {
        let res = models::user::find_by_id(&self.db, user_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| u.password_hash))
    }

    async fn find_invitation_by_code(&self, code: &str) -> Result<Option<InvitationTicket>, AuthError> {
        let res = models::invitation::find_by_code(&self.db, code)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|i| InvitationTicket {
            id: i.id,
            email: i.email,
            role: i.role,
            is_used: i.is_used,
            invited_by: i.invited_by,
            expires_at: i.expires_at.into(),
        }))
    }

    async fn consume_invitation_and_create_user(
        &self,
        invitation_id: Uuid,
        email: &str,
        username: &str,
        password_hash: &str,
        role: Role,
        invited_by: Option<Uuid>,
    ) -> Result<AuthUser, AuthError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        // Re-read inside the transaction so a concurrent registration with
        // the same code loses cleanly.
        let invitation = models::invitation::Entity::find_by_id(invitation_id)
            .one(&txn)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?
            .ok_or(AuthError::InvalidInvitation)?;
        if invitation.is_used {
            return Err(AuthError::InvalidInvitation);
        }

        let now = Utc::now();
        let mut inv_am: models::invitation::ActiveModel = invitation.into();
        inv_am.is_used = Set(true);
        inv_am.used_at = Set(Some(now.into()));
        inv_am
            .update(&txn)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        let existing = models::user::Entity::find()
            .filter(models::user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&txn)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        if existing.is_some() {
            return Err(AuthError::Conflict);
        }

        let user_am = models::user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.trim().to_lowercase()),
            username: Set(username.trim().to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role),
            is_active: Set(true),
            invited_by: Set(invited_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = user_am
            .insert(&txn)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(to_auth_user(created))
    }
}
