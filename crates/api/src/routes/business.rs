//! Own-business endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use domain::models::{
    Business, BusinessResponse, BusinessStatus, CreateBusinessRequest, NewBusiness,
    SaveDesignRequest, UpdateBusinessRequest,
};
use domain::services::{self, ResolvedDesign, SaveOutcome, TrialWindow};
use persistence::repositories::{BusinessRepository, DesignVersionRepository};
use serde::Serialize;
use shared::validation::{slugify, validate_slug};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OwnedBusiness;
use crate::middleware::metrics::record_design_published;
use crate::middleware::user_auth::UserAuth;

/// Response of the editor preview endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayDesignResponse {
    pub effective_status: BusinessStatus,
    pub design: Option<ResolvedDesign>,
}

fn business_response(business: Business) -> BusinessResponse {
    let effective_status = business.effective_status(Utc::now());
    BusinessResponse {
        business,
        effective_status,
    }
}

/// Appends a short random suffix to a slug base.
fn suffixed_slug(base: &str) -> String {
    let suffix = &Uuid::new_v4().simple().to_string()[..6];
    let base = if base.is_empty() { "menu" } else { base };
    format!("{}-{}", base, suffix)
}

/// Derives a free slug from the business name.
async fn derive_slug(repo: &BusinessRepository, name: &str) -> Result<String, ApiError> {
    let base = slugify(name);
    // Leave room for the suffix
    let base: String = base.chars().take(50).collect();
    let base = base.trim_end_matches('-').to_string();

    if validate_slug(&base).is_ok() && !repo.slug_exists(&base).await? {
        return Ok(base);
    }

    for _ in 0..3 {
        let candidate = suffixed_slug(&base);
        if !repo.slug_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Err(ApiError::Conflict(
        "Could not derive a free slug, please choose one".to_string(),
    ))
}

/// Get the caller's business.
///
/// GET /api/v1/business
pub async fn get_business(owned: OwnedBusiness) -> Json<BusinessResponse> {
    Json(business_response(owned.business))
}

/// Create the caller's business. One business per owner.
///
/// POST /api/v1/business
pub async fn create_business(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateBusinessRequest>,
) -> Result<(StatusCode, Json<BusinessResponse>), ApiError> {
    request.validate()?;

    let repo = BusinessRepository::new(state.pool.clone());

    if repo.find_by_owner(auth.user_id).await?.is_some() {
        return Err(ApiError::Conflict("You already have a business".to_string()));
    }

    let slug = match &request.slug {
        Some(slug) => {
            if repo.slug_exists(slug).await? {
                return Err(ApiError::Conflict(format!("Slug '{}' is taken", slug)));
            }
            slug.clone()
        }
        None => derive_slug(&repo, &request.name).await?,
    };

    let window = TrialWindow::trial(state.config.limits.trial_days, Utc::now());

    let business = repo
        .create(&NewBusiness {
            owner_id: auth.user_id,
            slug,
            name: request.name,
            description: request.description,
            phone: request.phone,
            address: request.address,
            logo_url: request.logo_url,
            expires_at: window.expires_at,
        })
        .await?;

    info!(
        business_id = %business.id,
        owner_id = %auth.user_id,
        slug = %business.slug,
        expires_at = ?business.expires_at,
        "Business created"
    );

    Ok((StatusCode::CREATED, Json(business_response(business))))
}

/// Update profile fields of the caller's business.
///
/// PUT /api/v1/business
pub async fn update_business(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Json(request): Json<UpdateBusinessRequest>,
) -> Result<Json<BusinessResponse>, ApiError> {
    request.validate()?;

    let repo = BusinessRepository::new(state.pool.clone());

    if let Some(slug) = &request.slug {
        if *slug != owned.business.slug && repo.slug_exists(slug).await? {
            return Err(ApiError::Conflict(format!("Slug '{}' is taken", slug)));
        }
    }

    let business = repo
        .update_profile(owned.business.id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Business not found".to_string()))?;

    info!(business_id = %business.id, "Business updated");

    Ok(Json(business_response(business)))
}

/// Legacy save: store the design as a new active version and point the QR
/// code at it.
///
/// PUT /api/v1/business/design
pub async fn save_design(
    State(state): State<AppState>,
    owned: OwnedBusiness,
    Json(request): Json<SaveDesignRequest>,
) -> Result<Json<SaveOutcome>, ApiError> {
    request
        .design
        .validate_with_limits(state.config.limits.max_embedded_image_bytes)?;

    let versions = DesignVersionRepository::new(state.pool.clone());
    let businesses = BusinessRepository::new(state.pool.clone());

    let outcome = services::save_and_publish(
        &versions,
        &businesses,
        owned.business.id,
        request.design,
        Utc::now(),
    )
    .await?;

    record_design_published(outcome.is_fully_published());
    info!(
        business_id = %owned.business.id,
        version_id = %outcome.version.id,
        qr_linked = outcome.is_fully_published(),
        "Design saved"
    );

    Ok(Json(outcome))
}

/// Resolve the design the public page would show.
///
/// GET /api/v1/business/display-design
pub async fn display_design(
    State(state): State<AppState>,
    owned: OwnedBusiness,
) -> Json<DisplayDesignResponse> {
    let versions = DesignVersionRepository::new(state.pool.clone());
    let design = services::resolve_display_design(&versions, &owned.business).await;

    Json(DisplayDesignResponse {
        effective_status: owned.business.effective_status(Utc::now()),
        design,
    })
}
