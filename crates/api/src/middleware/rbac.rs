//! Role-based access control for super-admin routes.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// Middleware that requires the `super_admin` role.
///
/// Runs after `require_user_auth`, which stores `UserAuth` in extensions.
pub async fn require_super_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<UserAuth>() {
        Some(auth) if auth.is_super_admin() => next.run(req).await,
        Some(auth) => {
            tracing::warn!(user_id = %auth.user_id, "Super-admin route denied");
            ApiError::Forbidden("Super-admin role required".into()).into_response()
        }
        None => ApiError::Unauthorized("Authentication required".into()).into_response(),
    }
}
