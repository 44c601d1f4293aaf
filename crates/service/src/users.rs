//! Admin-only user management.
//!
//! The acting admin can never change their own role, flip their own
//! active flag, or delete themselves. Those calls fail with Forbidden so
//! the last admin cannot lock everyone out by accident.

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::user::{self, Role};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub admins: u64,
    /// Accounts created within the last 30 days.
    pub recent: u64,
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Db(format!("password hashing failed: {e}")))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    user::Entity::find()
        .order_by_asc(user::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// Direct account creation, bypassing the invitation flow.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn create(db: &DatabaseConnection, input: NewUser) -> Result<user::Model, ServiceError> {
    if input.password.len() < 8 {
        return Err(ServiceError::Validation("password must be at least 8 characters".into()));
    }
    user::validate_email(&input.email)?;
    user::validate_username(&input.username)?;
    if user::find_by_email(db, &input.email).await?.is_some() {
        return Err(ServiceError::Conflict("a user with this email already exists".into()));
    }
    let hash = hash_password(&input.password)?;
    let created = user::create(db, &input.email, &input.username, &hash, input.role, None).await?;
    info!(user_id = %created.id, role = %created.role.as_str(), "user_created");
    Ok(created)
}

#[instrument(skip(db, update))]
pub async fn update(
    db: &DatabaseConnection,
    actor_id: Uuid,
    id: Uuid,
    update: UserUpdate,
) -> Result<user::Model, ServiceError> {
    let current = user::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    if actor_id == id && (update.role.is_some() || update.is_active.is_some()) {
        return Err(ServiceError::Forbidden(
            "you cannot change your own role or active status".into(),
        ));
    }
    if let Some(username) = &update.username {
        user::validate_username(username)?;
    }

    let mut am: user::ActiveModel = current.into();
    if let Some(v) = update.username {
        am.username = Set(v.trim().to_string());
    }
    if let Some(v) = update.role {
        am.role = Set(v);
    }
    if let Some(v) = update.is_active {
        am.is_active = Set(v);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn toggle_status(
    db: &DatabaseConnection,
    actor_id: Uuid,
    id: Uuid,
) -> Result<user::Model, ServiceError> {
    if actor_id == id {
        return Err(ServiceError::Forbidden("you cannot deactivate your own account".into()));
    }
    let current = user::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    let next = !current.is_active;
    let mut am: user::ActiveModel = current.into();
    am.is_active = Set(next);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(user_id = %id, is_active = next, "user_status_toggled");
    Ok(updated)
}

pub async fn remove(db: &DatabaseConnection, actor_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
    if actor_id == id {
        return Err(ServiceError::Forbidden("you cannot delete your own account".into()));
    }
    if user::find_by_id(db, id).await?.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    user::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(user_id = %id, "user_deleted");
    Ok(())
}

pub async fn stats(db: &DatabaseConnection) -> Result<UserStats, ServiceError> {
    let count = |q: sea_orm::Select<user::Entity>| async move {
        q.count(db).await.map_err(|e| ServiceError::Db(e.to_string()))
    };
    let total = count(user::Entity::find()).await?;
    let active = count(user::Entity::find().filter(user::Column::IsActive.eq(true))).await?;
    let admins = count(user::Entity::find().filter(user::Column::Role.eq(Role::Admin))).await?;
    let cutoff = Utc::now() - Duration::days(30);
    let recent = count(user::Entity::find().filter(user::Column::CreatedAt.gte(cutoff))).await?;
    Ok(UserStats { total, active, inactive: total - active, admins, recent })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::try_db;

    fn unique_email() -> String {
        format!("u-{}@example.com", Uuid::new_v4())
    }

    #[tokio::test]
    async fn self_protection_blocks_role_and_delete() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else {
            eprintln!("skip: database unreachable");
            return Ok(());
        };

        let admin = create(
            &db,
            NewUser {
                email: unique_email(),
                username: "admin".into(),
                password: "correcthorse".into(),
                role: Role::Admin,
            },
        )
        .await?;

        let err = update(&db, admin.id, admin.id, UserUpdate { role: Some(Role::Viewer), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(matches!(
            toggle_status(&db, admin.id, admin.id).await.unwrap_err(),
            ServiceError::Forbidden(_)
        ));
        assert!(matches!(
            remove(&db, admin.id, admin.id).await.unwrap_err(),
            ServiceError::Forbidden(_)
        ));

        // renaming yourself is still allowed
        let renamed = update(
            &db,
            admin.id,
            admin.id,
            UserUpdate { username: Some("root-admin".into()), ..Default::default() },
        )
        .await?;
        assert_eq!(renamed.username, "root-admin");

        let other = create(
            &db,
            NewUser {
                email: unique_email(),
                username: "viewer".into(),
                password: "correcthorse".into(),
                role: Role::Viewer,
            },
        )
        .await?;
        let toggled = toggle_status(&db, admin.id, other.id).await?;
        assert!(!toggled.is_active);

        remove(&db, admin.id, other.id).await?;
        user::Entity::delete_by_id(admin.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else {
            eprintln!("skip: database unreachable");
            return Ok(());
        };

        let email = unique_email();
        let first = create(
            &db,
            NewUser {
                email: email.clone(),
                username: "first".into(),
                password: "correcthorse".into(),
                role: Role::Editor,
            },
        )
        .await?;
        let err = create(
            &db,
            NewUser {
                email,
                username: "second".into(),
                password: "correcthorse".into(),
                role: Role::Editor,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        user::Entity::delete_by_id(first.id).exec(&db).await?;
        Ok(())
    }
}
