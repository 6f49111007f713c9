//! Design version entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{DesignDocument, DesignVersion, DesignVersionSummary};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the design_versions table.
#[derive(Debug, Clone, FromRow)]
pub struct DesignVersionEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub design: Option<JsonValue>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DesignVersionEntity> for DesignVersion {
    fn from(entity: DesignVersionEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            name: entity.name,
            description: entity.description,
            design: entity.design.as_ref().and_then(DesignDocument::from_json),
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// List row without the design body.
#[derive(Debug, Clone, FromRow)]
pub struct DesignVersionSummaryEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DesignVersionSummaryEntity> for DesignVersionSummary {
    fn from(entity: DesignVersionSummaryEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            name: entity.name,
            description: entity.description,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
