//! Super-admin tenant management handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::{
    BusinessResponse, ListBusinessesQuery, ListBusinessesResponse, SetBusinessStatusRequest,
    TimeWindowRequest,
};
use domain::services::TrialWindow;
use persistence::repositories::BusinessRepository;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_businesses_paused;
use crate::middleware::user_auth::UserAuth;

fn business_not_found() -> ApiError {
    ApiError::NotFound("Business not found".to_string())
}

/// List all businesses with their effective status.
///
/// Expired rows are written as paused first so the stored status matches.
///
/// GET /api/v1/admin/businesses
pub async fn list_businesses(
    State(state): State<AppState>,
    Query(query): Query<ListBusinessesQuery>,
) -> Result<Json<ListBusinessesResponse>, ApiError> {
    let repo = BusinessRepository::new(state.pool.clone());
    let now = Utc::now();

    match repo.pause_expired(now).await {
        Ok(0) => {}
        Ok(paused) => {
            record_businesses_paused(paused);
            info!(paused, "Paused expired businesses before listing");
        }
        // Listing still reports effective status
        Err(e) => warn!(error = %e, "Expiry sync failed"),
    }

    let (data, total) = repo.list_for_admin(&query, now).await?;

    Ok(Json(ListBusinessesResponse {
        data,
        page: query.page(),
        per_page: query.per_page(),
        total,
    }))
}

/// Set a business's trial window from `minutes` or `days`.
///
/// PUT /api/v1/admin/businesses/:id/time-window
pub async fn set_time_window(
    State(state): State<AppState>,
    admin: UserAuth,
    Path(business_id): Path<Uuid>,
    Json(request): Json<TimeWindowRequest>,
) -> Result<Json<BusinessResponse>, ApiError> {
    let now = Utc::now();
    let window = TrialWindow::from_request(&request, now)?;

    let business = BusinessRepository::new(state.pool.clone())
        .set_window(business_id, window.status, window.expires_at)
        .await?
        .ok_or_else(business_not_found)?;

    info!(
        admin_id = %admin.user_id,
        business_id = %business_id,
        status = %window.status,
        expires_at = ?window.expires_at,
        "Business time window set"
    );

    let effective_status = business.effective_status(now);
    Ok(Json(BusinessResponse {
        business,
        effective_status,
    }))
}

/// Pause or resume a business. The expiry is left untouched.
///
/// PUT /api/v1/admin/businesses/:id/status
pub async fn set_status(
    State(state): State<AppState>,
    admin: UserAuth,
    Path(business_id): Path<Uuid>,
    Json(request): Json<SetBusinessStatusRequest>,
) -> Result<Json<BusinessResponse>, ApiError> {
    let business = BusinessRepository::new(state.pool.clone())
        .set_status(business_id, request.status)
        .await?
        .ok_or_else(business_not_found)?;

    info!(
        admin_id = %admin.user_id,
        business_id = %business_id,
        status = %request.status,
        "Business status set"
    );

    let effective_status = business.effective_status(Utc::now());
    Ok(Json(BusinessResponse {
        business,
        effective_status,
    }))
}

/// Delete a business with its versions and menu.
///
/// DELETE /api/v1/admin/businesses/:id
pub async fn delete_business(
    State(state): State<AppState>,
    admin: UserAuth,
    Path(business_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = BusinessRepository::new(state.pool.clone())
        .delete(business_id)
        .await?;

    if !deleted {
        return Err(business_not_found());
    }

    warn!(admin_id = %admin.user_id, business_id = %business_id, "Business deleted");

    Ok(StatusCode::NO_CONTENT)
}
