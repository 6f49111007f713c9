//! Business entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AdminBusinessSummary, Business, BusinessStatus, DesignDocument};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for business_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "business_status", rename_all = "lowercase")]
pub enum BusinessStatusDb {
    Active,
    Paused,
}

impl From<BusinessStatusDb> for BusinessStatus {
    fn from(db: BusinessStatusDb) -> Self {
        match db {
            BusinessStatusDb::Active => Self::Active,
            BusinessStatusDb::Paused => Self::Paused,
        }
    }
}

impl From<BusinessStatus> for BusinessStatusDb {
    fn from(status: BusinessStatus) -> Self {
        match status {
            BusinessStatus::Active => Self::Active,
            BusinessStatus::Paused => Self::Paused,
        }
    }
}

/// Database row mapping for the businesses table.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub design: Option<JsonValue>,
    pub qr_design_version_id: Option<Uuid>,
    pub status: BusinessStatusDb,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BusinessEntity> for Business {
    fn from(entity: BusinessEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            slug: entity.slug,
            name: entity.name,
            description: entity.description,
            phone: entity.phone,
            address: entity.address,
            logo_url: entity.logo_url,
            // Unreadable legacy bodies are treated as absent
            design: entity.design.as_ref().and_then(DesignDocument::from_json),
            qr_design_version_id: entity.qr_design_version_id,
            status: entity.status.into(),
            expires_at: entity.expires_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Row of the super-admin listing query.
#[derive(Debug, Clone, FromRow)]
pub struct AdminBusinessSummaryEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: Option<String>,
    pub slug: String,
    pub name: String,
    pub status: BusinessStatusDb,
    pub expires_at: Option<DateTime<Utc>>,
    pub version_count: i64,
    pub created_at: DateTime<Utc>,
}

impl AdminBusinessSummaryEntity {
    /// Converts the row, computing the effective status at `now`.
    pub fn into_summary(self, now: DateTime<Utc>) -> AdminBusinessSummary {
        let status = BusinessStatus::from(self.status);
        AdminBusinessSummary {
            id: self.id,
            owner_id: self.owner_id,
            owner_email: self.owner_email,
            slug: self.slug,
            name: self.name,
            status,
            effective_status: domain::services::effective_status(status, self.expires_at, now),
            expires_at: self.expires_at,
            version_count: self.version_count,
            created_at: self.created_at,
        }
    }
}
