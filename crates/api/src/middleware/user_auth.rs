//! Authentication middleware for hosted auth provider tokens.
//!
//! Verifies the Bearer token, then loads (or lazily creates) the caller's
//! profile so downstream handlers and the admin guard see the stored role.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::UserRole;
use persistence::repositories::ProfileRepository;
use shared::jwt::{extract_user_id, TokenVerifier};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// Auth provider user ID (token `sub`).
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
}

impl UserAuth {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

/// Identity carried by a verified token, before the profile lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Extracts the token from an `Authorization: Bearer` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verifies a token and returns the identity it carries.
pub fn verify_token(verifier: &TokenVerifier, token: &str) -> Result<TokenIdentity, ApiError> {
    let claims = verifier.verify(token)?;
    let user_id = extract_user_id(&claims)?;
    Ok(TokenIdentity {
        user_id,
        email: claims.email,
    })
}

/// Middleware that requires a valid provider token.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
    {
        Some(token) => token.to_string(),
        None => {
            return ApiError::Unauthorized("Missing or invalid Authorization header".into())
                .into_response()
        }
    };

    let identity = match verify_token(&state.token_verifier, &token) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            return e.into_response();
        }
    };

    let profiles = ProfileRepository::new(state.pool.clone());
    let profile = match profiles.find_by_id(identity.user_id).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => profiles
            .ensure(identity.user_id, identity.email.as_deref())
            .await
            .inspect(|_| tracing::info!(user_id = %identity.user_id, "Profile created")),
        Err(e) => Err(e),
    };

    let profile = match profile {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(user_id = %identity.user_id, error = %e, "Failed to load profile");
            return ApiError::ServiceUnavailable("Authentication service unavailable".into())
                .into_response();
        }
    };

    req.extensions_mut().insert(UserAuth {
        user_id: profile.id,
        email: profile.email.or(identity.email),
        role: profile.role,
    });
    next.run(req).await
}
