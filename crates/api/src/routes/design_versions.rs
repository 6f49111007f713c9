//! Design version endpoint handlers.
//!
//! All routes act on the caller's own business; version ids from another
//! business answer 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    BusinessResponse, CreateDesignVersionRequest, DesignVersion, LinkQrDesignRequest,
    ListDesignVersionsResponse, NewDesignVersion, UpdateDesignVersionRequest,
};
use domain::services;
use persistence::repositories::{BusinessRepository, DesignVersionRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OwnedBusiness;
use crate::middleware::metrics::{record_qr_pointer_changed, record_version_activated};

/// List versions of the caller's business, newest first.
///
/// GET /api/v1/business/design-versions
pub async fn list_versions(
    State(state): State<AppState>,
    owned: OwnedBusiness,
) -> Result<Json<ListDesignVersionsResponse>, ApiError> {
    let repo = DesignVersionRepository::new(state.pool.clone());
    let response = services::list_versions(&repo, &owned.business).await?;
    Ok(Json(response))
}

/// Create a version, optionally making it active.
///
/// POST /api/v1/business/design-versions
pub async fn create_version(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Json(request): Json<CreateDesignVersionRequest>,
) -> Result<(StatusCode, Json<DesignVersion>), ApiError> {
    request.validate()?;
    request
        .design
        .validate_with_limits(state.config.limits.max_embedded_image_bytes)?;

    let repo = DesignVersionRepository::new(state.pool.clone());
    let version = services::create_version(
        &repo,
        NewDesignVersion {
            business_id: owned.business.id,
            name: request.name,
            description: request.description.filter(|d| !d.trim().is_empty()),
            design: request.design,
            is_active: request.set_as_active,
        },
        state.config.limits.max_versions_per_business,
    )
    .await?;

    if version.is_active {
        record_version_activated();
    }
    info!(
        business_id = %owned.business.id,
        version_id = %version.id,
        is_active = version.is_active,
        "Design version created"
    );

    Ok((StatusCode::CREATED, Json(version)))
}

/// Fetch one version with its design body.
///
/// GET /api/v1/business/design-versions/:id
pub async fn get_version(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(version_id): Path<Uuid>,
) -> Result<Json<DesignVersion>, ApiError> {
    let repo = DesignVersionRepository::new(state.pool.clone());
    let version = services::get_version(&repo, owned.business.id, version_id).await?;
    Ok(Json(version))
}

/// Update a version. `setAsActive: true` activates it, `false` clears its
/// flag only.
///
/// PATCH /api/v1/business/design-versions/:id
pub async fn update_version(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(version_id): Path<Uuid>,
    Json(request): Json<UpdateDesignVersionRequest>,
) -> Result<Json<DesignVersion>, ApiError> {
    request.validate()?;
    if let Some(design) = &request.design {
        design.validate_with_limits(state.config.limits.max_embedded_image_bytes)?;
    }

    let repo = DesignVersionRepository::new(state.pool.clone());
    let version = services::update_version(
        &repo,
        owned.business.id,
        version_id,
        &request.changes(),
        request.set_as_active,
    )
    .await?;

    if request.set_as_active == Some(true) {
        record_version_activated();
    }
    info!(business_id = %owned.business.id, version_id = %version_id, "Design version updated");

    Ok(Json(version))
}

/// Delete an inactive version.
///
/// DELETE /api/v1/business/design-versions/:id
pub async fn delete_version(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(version_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = DesignVersionRepository::new(state.pool.clone());
    services::delete_version(&repo, owned.business.id, version_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Make a version the active one. Does not move the QR pointer.
///
/// POST /api/v1/business/design-versions/:id/activate
pub async fn activate_version(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Path(version_id): Path<Uuid>,
) -> Result<Json<DesignVersion>, ApiError> {
    let repo = DesignVersionRepository::new(state.pool.clone());
    let version = services::set_active_version(&repo, owned.business.id, version_id).await?;

    record_version_activated();
    Ok(Json(version))
}

/// Point the QR code at a version.
///
/// PUT /api/v1/business/qr-design
pub async fn link_qr_design(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Json(request): Json<LinkQrDesignRequest>,
) -> Result<Json<BusinessResponse>, ApiError> {
    let versions = DesignVersionRepository::new(state.pool.clone());
    let businesses = BusinessRepository::new(state.pool.clone());

    let business = services::link_design_to_qr(
        &versions,
        &businesses,
        owned.business.id,
        request.version_id,
    )
    .await?;

    record_qr_pointer_changed(true);
    let effective_status = business.effective_status(chrono::Utc::now());
    Ok(Json(BusinessResponse {
        business,
        effective_status,
    }))
}

/// Clear the QR pointer so the public page falls back to the inline design.
///
/// DELETE /api/v1/business/qr-design
pub async fn unlink_qr_design(
    State(state): State<AppState>,
    owned: OwnedBusiness,
) -> Result<Json<BusinessResponse>, ApiError> {
    let businesses = BusinessRepository::new(state.pool.clone());
    let business = services::unlink_design_from_qr(&businesses, owned.business.id).await?;

    record_qr_pointer_changed(false);
    info!(business_id = %business.id, "QR design unlinked");

    let effective_status = business.effective_status(chrono::Utc::now());
    Ok(Json(BusinessResponse {
        business,
        effective_status,
    }))
}
