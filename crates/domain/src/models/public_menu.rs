//! Public menu response model.

use serde::Serialize;

use super::business::{BusinessStatus, PublicBusinessProfile};
use super::menu::CategoryWithItems;
use crate::services::design_resolution::ResolvedDesign;

/// What a diner's browser receives for a slug.
///
/// A paused menu carries neither a design nor categories. Otherwise exactly
/// one of `design` and `categories` is set: the categorized menu is only
/// returned when no design resolves.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicMenuResponse {
    pub business: PublicBusinessProfile,
    pub status: BusinessStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<ResolvedDesign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryWithItems>>,
}

impl PublicMenuResponse {
    pub fn paused(business: PublicBusinessProfile) -> Self {
        Self {
            business,
            status: BusinessStatus::Paused,
            design: None,
            categories: None,
        }
    }

    pub fn with_design(business: PublicBusinessProfile, design: ResolvedDesign) -> Self {
        Self {
            business,
            status: BusinessStatus::Active,
            design: Some(design),
            categories: None,
        }
    }

    pub fn with_categories(
        business: PublicBusinessProfile,
        categories: Vec<CategoryWithItems>,
    ) -> Self {
        Self {
            business,
            status: BusinessStatus::Active,
            design: None,
            categories: Some(categories),
        }
    }
}
