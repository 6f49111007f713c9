//! Design version domain models.
//!
//! A design version is a named, persisted Design Document owned by one
//! business. At most one version per business carries the active flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::design::DesignDocument;

/// Design version domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignVersion {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// `None` when the stored body is null or unreadable.
    pub design: Option<DesignDocument>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List view of a design version (design body omitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignVersionSummary {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DesignVersion> for DesignVersionSummary {
    fn from(version: DesignVersion) -> Self {
        Self {
            id: version.id,
            business_id: version.business_id,
            name: version.name,
            description: version.description,
            is_active: version.is_active,
            created_at: version.created_at,
            updated_at: version.updated_at,
        }
    }
}

/// Input for inserting a design version.
#[derive(Debug, Clone)]
pub struct NewDesignVersion {
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub design: DesignDocument,
    pub is_active: bool,
}

/// Partial update of a design version's editable fields.
#[derive(Debug, Clone, Default)]
pub struct DesignVersionChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub design: Option<DesignDocument>,
}

impl DesignVersionChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.design.is_none()
    }
}

/// POST request to create a design version.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDesignVersionRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub design: DesignDocument,
    #[serde(default)]
    pub set_as_active: bool,
}

/// PATCH request to update a design version.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDesignVersionRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub design: Option<DesignDocument>,
    /// `true` activates this version (clearing the others), `false` clears
    /// the flag on this version only.
    pub set_as_active: Option<bool>,
}

impl UpdateDesignVersionRequest {
    /// Editable field changes carried by this request.
    pub fn changes(&self) -> DesignVersionChanges {
        DesignVersionChanges {
            name: self.name.clone(),
            description: self.description.clone().map(|d| {
                if d.trim().is_empty() {
                    None
                } else {
                    Some(d)
                }
            }),
            design: self.design.clone(),
        }
    }
}

/// PUT request to point the QR code at a version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkQrDesignRequest {
    pub version_id: Uuid,
}

/// Response for version list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDesignVersionsResponse {
    pub versions: Vec<DesignVersionSummary>,
    pub active_version_id: Option<Uuid>,
    pub qr_design_version_id: Option<Uuid>,
}
