//! Menu catalogue endpoint handlers (categories and items).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    Category, CategoryWithItems, CreateCategoryRequest, CreateMenuItemRequest, MenuItem,
    UpdateCategoryRequest, UpdateMenuItemRequest,
};
use persistence::repositories::{CategoryRepository, MenuItemRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OwnedBusiness;

fn category_not_found() -> ApiError {
    ApiError::NotFound("Category not found".to_string())
}

fn item_not_found() -> ApiError {
    ApiError::NotFound("Menu item not found".to_string())
}

/// List categories with all their items.
///
/// GET /api/v1/business/categories
pub async fn list_categories(
    State(state): State<AppState>,
    owned: OwnedBusiness,
) -> Result<Json<Vec<CategoryWithItems>>, ApiError> {
    let categories = CategoryRepository::new(state.pool.clone())
        .list_by_business(owned.business.id)
        .await?;
    let items = MenuItemRepository::new(state.pool.clone())
        .list_by_business(owned.business.id, false)
        .await?;

    Ok(Json(CategoryWithItems::group(categories, items)))
}

/// POST /api/v1/business/categories
pub async fn create_category(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    request.validate()?;

    let category = CategoryRepository::new(state.pool.clone())
        .create(owned.business.id, &request)
        .await?;

    info!(business_id = %owned.business.id, category_id = %category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/business/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(category_id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    request.validate()?;

    let category = CategoryRepository::new(state.pool.clone())
        .update(owned.business.id, category_id, &request)
        .await?
        .ok_or_else(category_not_found)?;

    Ok(Json(category))
}

/// Delete a category and its items.
///
/// DELETE /api/v1/business/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = CategoryRepository::new(state.pool.clone())
        .delete(owned.business.id, category_id)
        .await?;

    if !deleted {
        return Err(category_not_found());
    }

    info!(business_id = %owned.business.id, category_id = %category_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/business/categories/:id/items
pub async fn create_item(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(category_id): Path<Uuid>,
    Json(request): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    request.validate()?;

    CategoryRepository::new(state.pool.clone())
        .find(owned.business.id, category_id)
        .await?
        .ok_or_else(category_not_found)?;

    let item = MenuItemRepository::new(state.pool.clone())
        .create(owned.business.id, category_id, &request)
        .await?;

    info!(business_id = %owned.business.id, item_id = %item.id, "Menu item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an item, including availability and moving it to another
/// category of the same business.
///
/// PUT /api/v1/business/items/:id
pub async fn update_item(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItem>, ApiError> {
    request.validate()?;

    if let Some(category_id) = request.category_id {
        CategoryRepository::new(state.pool.clone())
            .find(owned.business.id, category_id)
            .await?
            .ok_or_else(category_not_found)?;
    }

    let item = MenuItemRepository::new(state.pool.clone())
        .update(owned.business.id, item_id, &request)
        .await?
        .ok_or_else(item_not_found)?;

    Ok(Json(item))
}

/// DELETE /api/v1/business/items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = MenuItemRepository::new(state.pool.clone())
        .delete(owned.business.id, item_id)
        .await?;

    if !deleted {
        return Err(item_not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
