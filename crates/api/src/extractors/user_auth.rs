//! Extractor for the authenticated caller.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// Reads the `UserAuth` inserted by `require_user_auth`.
///
/// Handlers on routes without that middleware get 401.
#[async_trait]
impl<S> FromRequestParts<S> for UserAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserAuth>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use domain::models::UserRole;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_extracts_from_extensions() {
        let user_id = Uuid::new_v4();
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(UserAuth {
            user_id,
            email: Some("owner@example.com".to_string()),
            role: UserRole::Owner,
        });

        let auth = UserAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.user_id, user_id);
    }

    #[tokio::test]
    async fn test_missing_auth_is_unauthorized() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let result = UserAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
