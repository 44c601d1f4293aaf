use async_trait::async_trait;
use uuid::Uuid;

use models::user::Role;

use super::domain::{AuthUser, InvitationTicket};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>, AuthError>;

    async fn find_invitation_by_code(&self, code: &str) -> Result<Option<InvitationTicket>, AuthError>;

    /// Consume the invitation and create the account in one atomic step.
    /// Must fail without side effects when the invitation was consumed
    /// concurrently.
    async fn consume_invitation_and_create_user(
        &self,
        invitation_id: Uuid,
        email: &str,
        username: &str,
        password_hash: &str,
        role: Role,
        invited_by: Option<Uuid>,
    ) -> Result<AuthUser, AuthError>;
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, (AuthUser, String)>>, // key: email, value: (user, hash)
        invitations: Mutex<HashMap<String, InvitationTicket>>, // key: code
    }

    impl MockAuthRepository {
        pub fn with_invitation(self, code: &str, ticket: InvitationTicket) -> Self {
            self.invitations.lock().unwrap().insert(code.to_string(), ticket);
            self
        }

        pub fn insert_user(&self, user: AuthUser, password_hash: String) {
            self.users.lock().unwrap().insert(user.email.clone(), (user, password_hash));
        }

        pub fn invitation_by_id(&self, id: Uuid) -> Option<InvitationTicket> {
            self.invitations.lock().unwrap().values().find(|t| t.id == id).cloned()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            Ok(self.users.lock().unwrap().get(email).map(|(u, _)| u.clone()))
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|(u, _)| u.id == id)
                .map(|(u, _)| u.clone()))
        }

        async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>, AuthError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|(u, _)| u.id == user_id)
                .map(|(_, h)| h.clone()))
        }

        async fn find_invitation_by_code(&self, code: &str) -> Result<Option<InvitationTicket>, AuthError> {
            Ok(self.invitations.lock().unwrap().get(code).cloned())
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
            let _ = invited_by;
            let mut invitations = self.invitations.lock().unwrap();
            let ticket = invitations
                .values_mut()
                .find(|t| t.id == invitation_id)
                .ok_or(AuthError::InvalidInvitation)?;
            if ticket.is_used {
                return Err(AuthError::InvalidInvitation);
            }
            ticket.is_used = true;

            let mut users = self.users.lock().unwrap();
            if users.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                email: email.to_string(),
                username: username.to_string(),
                role,
                is_active: true,
            };
            users.insert(email.to_string(), (user.clone(), password_hash.to_string()));
            Ok(user)
        }
    }
}
