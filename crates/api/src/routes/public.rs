//! Public (unauthenticated) menu endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use domain::models::{
    BusinessStatus, CategoryWithItems, PublicBusinessProfile, PublicMenuResponse,
};
use domain::services;
use persistence::repositories::{
    BusinessRepository, CategoryRepository, DesignVersionRepository, MenuItemRepository,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Public menu page data for a slug.
///
/// Paused or expired businesses get their profile only. Otherwise the
/// resolved design is returned, or the categorized menu when no design
/// resolves.
///
/// GET /api/v1/public/menus/:slug
pub async fn get_public_menu(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicMenuResponse>, ApiError> {
    let business = BusinessRepository::new(state.pool.clone())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Menu not found".to_string()))?;

    let profile = PublicBusinessProfile::from(&business);

    if business.effective_status(Utc::now()) == BusinessStatus::Paused {
        return Ok(Json(PublicMenuResponse::paused(profile)));
    }

    let versions = DesignVersionRepository::new(state.pool.clone());
    if let Some(design) = services::resolve_display_design(&versions, &business).await {
        return Ok(Json(PublicMenuResponse::with_design(profile, design)));
    }

    let categories = CategoryRepository::new(state.pool.clone())
        .list_by_business(business.id)
        .await?;
    let items = MenuItemRepository::new(state.pool.clone())
        .list_by_business(business.id, true)
        .await?;

    Ok(Json(PublicMenuResponse::with_categories(
        profile,
        CategoryWithItems::group(categories, items),
    )))
}
