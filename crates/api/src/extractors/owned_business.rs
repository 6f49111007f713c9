//! Extractor for the caller's own business.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::Business;
use persistence::repositories::BusinessRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// The business owned by the authenticated caller.
///
/// Rejects with 404 when the caller has not created a business yet.
#[derive(Debug, Clone)]
pub struct OwnedBusiness {
    pub auth: UserAuth,
    pub business: Business,
}

#[async_trait]
impl FromRequestParts<AppState> for OwnedBusiness {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;

        let business = BusinessRepository::new(state.pool.clone())
            .find_by_owner(auth.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Business not found".to_string()))?;

        Ok(Self { auth, business })
    }
}
