//! Business (tenant) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::design::DesignDocument;

/// Stored or effective business status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessStatus {
    Active,
    Paused,
}

impl FromStr for BusinessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(BusinessStatus::Active),
            "paused" => Ok(BusinessStatus::Paused),
            _ => Err(format!("Unknown business status: {}", s)),
        }
    }
}

impl std::fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessStatus::Active => write!(f, "active"),
            BusinessStatus::Paused => write!(f, "paused"),
        }
    }
}

/// Business domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Business {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    /// Legacy inline design, used as the display fallback.
    pub design: Option<DesignDocument>,
    /// Version the QR code points to. Weak reference, may dangle.
    pub qr_design_version_id: Option<Uuid>,
    pub status: BusinessStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-facing business response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BusinessResponse {
    #[serde(flatten)]
    pub business: Business,
    pub effective_status: BusinessStatus,
}

/// Public profile shown alongside a published menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicBusinessProfile {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
}

impl From<&Business> for PublicBusinessProfile {
    fn from(business: &Business) -> Self {
        Self {
            name: business.name.clone(),
            slug: business.slug.clone(),
            description: business.description.clone(),
            phone: business.phone.clone(),
            address: business.address.clone(),
            logo_url: business.logo_url.clone(),
        }
    }
}

/// Input for inserting a business.
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub owner_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// POST request to create the caller's business.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateBusinessRequest {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: String,
    /// Derived from the name when absent.
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 40, message = "Phone must be at most 40 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: Option<String>,
    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,
}

/// PUT request to update the caller's business (partial). A blank
/// description, phone, address or logo URL clears the field.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "snake_case")]
pub struct UpdateBusinessRequest {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 40, message = "Phone must be at most 40 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: Option<String>,
    #[validate(custom(function = "shared::validation::validate_url_or_blank"))]
    pub logo_url: Option<String>,
}

/// PUT request for the legacy save-and-publish flow.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveDesignRequest {
    #[validate(nested)]
    pub design: DesignDocument,
}

/// PUT request to set a business time window.
///
/// `minutes` takes precedence over the legacy `days`. Both absent means
/// unlimited.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct TimeWindowRequest {
    pub minutes: Option<i64>,
    pub days: Option<i64>,
}

/// PUT request to pause or resume a business.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetBusinessStatusRequest {
    pub status: BusinessStatus,
}

/// Row of the super-admin tenant listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminBusinessSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: Option<String>,
    pub slug: String,
    pub name: String,
    pub status: BusinessStatus,
    pub effective_status: BusinessStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub version_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for the super-admin listing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListBusinessesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
}

impl ListBusinessesQuery {
    pub const DEFAULT_PER_PAGE: i64 = 25;
    pub const MAX_PER_PAGE: i64 = 100;

    /// Page number, starting at 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    /// Saturates for absurd page numbers; such pages are simply empty.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

/// Response for the super-admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListBusinessesResponse {
    pub data: Vec<AdminBusinessSummary>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "active".parse::<BusinessStatus>().unwrap(),
            BusinessStatus::Active
        );
        assert_eq!(
            "PAUSED".parse::<BusinessStatus>().unwrap(),
            BusinessStatus::Paused
        );
        assert!("expired".parse::<BusinessStatus>().is_err());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(BusinessStatus::Paused).unwrap(),
            json!("paused")
        );
        assert_eq!(BusinessStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateBusinessRequest = serde_json::from_value(json!({
            "name": "Cafe Luna",
            "slug": "cafe-luna",
            "logo_url": "https://cdn.example.com/luna.png"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let bad_slug: CreateBusinessRequest = serde_json::from_value(json!({
            "name": "Cafe Luna",
            "slug": "Cafe Luna"
        }))
        .unwrap();
        assert!(bad_slug.validate().is_err());

        let bad_logo: CreateBusinessRequest = serde_json::from_value(json!({
            "name": "Cafe Luna",
            "logo_url": "not a url"
        }))
        .unwrap();
        assert!(bad_logo.validate().is_err());
    }

    #[test]
    fn test_update_request_allows_blank_logo() {
        let request: UpdateBusinessRequest =
            serde_json::from_value(json!({ "logo_url": "", "phone": "" })).unwrap();
        assert!(request.validate().is_ok());

        let request: UpdateBusinessRequest =
            serde_json::from_value(json!({ "logo_url": "not a url" })).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_time_window_request() {
        let request: TimeWindowRequest =
            serde_json::from_value(json!({"minutes": null})).unwrap();
        assert!(request.minutes.is_none());
        assert!(request.days.is_none());

        let request: TimeWindowRequest = serde_json::from_value(json!({"days": 7})).unwrap();
        assert_eq!(request.days, Some(7));
    }

    #[test]
    fn test_list_query_paging() {
        let query = ListBusinessesQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 25);
        assert_eq!(query.offset(), 0);

        let query = ListBusinessesQuery {
            page: Some(3),
            per_page: Some(500),
            search: None,
        };
        assert_eq!(query.per_page(), 100);
        assert_eq!(query.offset(), 200);

        let query = ListBusinessesQuery {
            page: Some(-4),
            per_page: Some(0),
            search: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 1);
    }

    #[test]
    fn test_list_query_huge_page() {
        let query = ListBusinessesQuery {
            page: Some(i64::MAX),
            per_page: Some(25),
            search: None,
        };
        assert_eq!(query.page(), i64::MAX);
        assert_eq!(query.offset(), i64::MAX);

        let query = ListBusinessesQuery {
            page: Some(i64::MAX),
            per_page: Some(1),
            search: None,
        };
        assert_eq!(query.offset(), i64::MAX - 1);
    }
}
