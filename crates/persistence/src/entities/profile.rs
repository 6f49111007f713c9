//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Profile, UserRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRoleDb {
    Owner,
    SuperAdmin,
}

impl From<UserRoleDb> for UserRole {
    fn from(db: UserRoleDb) -> Self {
        match db {
            UserRoleDb::Owner => Self::Owner,
            UserRoleDb::SuperAdmin => Self::SuperAdmin,
        }
    }
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Owner => Self::Owner,
            UserRole::SuperAdmin => Self::SuperAdmin,
        }
    }
}

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: UserRoleDb,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            role: entity.role.into(),
            created_at: entity.created_at,
        }
    }
}
