use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, Set};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::user::{self, Role};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    #[sea_orm(unique)]
    pub code: String,
    pub role: Role,
    pub is_used: bool,
    pub invited_by: Option<Uuid>,
    pub expires_at: DateTimeWithTimeZone,
    pub used_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    InvitedBy,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::InvitedBy => Entity::belongs_to(user::Entity)
                .from(Column::InvitedBy)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Derived invitation status. Never stored; computed from `is_used` and
/// `expires_at` at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Used,
    Expired,
}

impl Model {
    pub fn status_at(&self, now: DateTime<Utc>) -> Status {
        if self.is_used {
            Status::Used
        } else if now > self.expires_at {
            Status::Expired
        } else {
            Status::Pending
        }
    }

    pub fn status(&self) -> Status {
        self.status_at(Utc::now())
    }
}

pub async fn create(
    db: &DatabaseConnection,
    email: &str,
    code: &str,
    role: Role,
    invited_by: Option<Uuid>,
    expires_at: DateTime<Utc>,
) -> Result<Model, errors::ModelError> {
    user::validate_email(email)?;
    if code.trim().is_empty() {
        return Err(errors::ModelError::Validation("code required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.trim().to_lowercase()),
        code: Set(code.to_string()),
        role: Set(role),
        is_used: Set(false),
        invited_by: Set(invited_by),
        expires_at: Set(expires_at.into()),
        used_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_code(db: &DatabaseConnection, code: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Code.eq(code))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Most recent unused, unexpired invitation for an email, if any.
pub async fn find_pending_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .filter(Column::IsUsed.eq(false))
        .filter(Column::ExpiresAt.gt(Utc::now()))
        .order_by_desc(Column::CreatedAt)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(is_used: bool, expires_in: Duration) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            email: "x@y.com".into(),
            code: "abc".into(),
            role: Role::Viewer,
            is_used,
            invited_by: None,
            expires_at: (now + expires_in).into(),
            used_at: None,
            created_at: now.into(),
        }
    }

    #[test]
    fn status_is_derived_not_stored() {
        assert_eq!(invitation(false, Duration::days(7)).status(), Status::Pending);
        assert_eq!(invitation(false, Duration::days(-1)).status(), Status::Expired);
        // used wins over expired
        assert_eq!(invitation(true, Duration::days(-1)).status(), Status::Used);
    }
}
