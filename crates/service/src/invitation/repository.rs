use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use models::invitation::Model as Invitation;
use models::user::Role;

use super::errors::InvitationError;

/// Repository abstraction for invitation persistence.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn user_email_exists(&self, email: &str) -> Result<bool, InvitationError>;
    async fn find_pending_by_email(&self, email: &str) -> Result<Option<Invitation>, InvitationError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>, InvitationError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>, InvitationError>;
    async fn insert(
        &self,
        email: &str,
        code: &str,
        role: Role,
        invited_by: Option<Uuid>,
        expires_at: DateTime<Utc>,
    ) -> Result<Invitation, InvitationError>;
    async fn delete(&self, id: Uuid) -> Result<(), InvitationError>;
    async fn list(&self) -> Result<Vec<Invitation>, InvitationError>;
}

/// In-memory mock for unit tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockInvitationRepository {
        pub users: Mutex<Vec<String>>,
        pub invitations: Mutex<HashMap<Uuid, Invitation>>,
    }

    impl MockInvitationRepository {
        pub fn with_user(self, email: &str) -> Self {
            self.users.lock().unwrap().push(email.to_lowercase());
            self
        }

        pub fn with_invitation(self, invitation: Invitation) -> Self {
            self.invitations.lock().unwrap().insert(invitation.id, invitation);
            self
        }
    }

    #[async_trait]
    impl InvitationRepository for MockInvitationRepository {
        async fn user_email_exists(&self, email: &str) -> Result<bool, InvitationError> {
            Ok(self.users.lock().unwrap().contains(&email.to_lowercase()))
        }

        async fn find_pending_by_email(&self, email: &str) -> Result<Option<Invitation>, InvitationError> {
            let now = Utc::now();
            Ok(self
                .invitations
                .lock()
                .unwrap()
                .values()
                .find(|i| {
                    i.email == email.to_lowercase()
                        && i.status_at(now) == models::invitation::Status::Pending
                })
                .cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>, InvitationError> {
            Ok(self.invitations.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_code(&self, code: &str) -> Result<Option<Invitation>, InvitationError> {
            Ok(self
                .invitations
                .lock()
                .unwrap()
                .values()
                .find(|i| i.code == code)
                .cloned())
        }

        async fn insert(
            &self,
            email: &str,
            code: &str,
            role: Role,
            invited_by: Option<Uuid>,
            expires_at: DateTime<Utc>,
        ) -> Result<Invitation, InvitationError> {
            let now = Utc::now();
            let invitation = Invitation {
                id: Uuid::new_v4(),
                email: email.to_lowercase(),
                code: code.to_string(),
                role,
                is_used: false,
                invited_by,
                expires_at: expires_at.into(),
                used_at: None,
                created_at: now.into(),
            };
            self.invitations.lock().unwrap().insert(invitation.id, invitation.clone());
            Ok(invitation)
        }

        async fn delete(&self, id: Uuid) -> Result<(), InvitationError> {
            self.invitations.lock().unwrap().remove(&id);
            Ok(())
        }

        async fn list(&self) -> Result<Vec<Invitation>, InvitationError> {
            Ok(self.invitations.lock().unwrap().values().cloned().collect())
        }
    }
}
