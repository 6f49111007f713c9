use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use shared::jwt::{JwtError, TokenVerifier};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_super_admin,
    require_user_auth, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{admin, business, design_versions, health, menu, public};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub token_verifier: Arc<TokenVerifier>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        // Development: allow any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Builds the shared state. Fails when the auth secret is unusable.
pub fn build_state(config: Config, pool: PgPool) -> Result<AppState, JwtError> {
    let config = Arc::new(config);

    let token_verifier = Arc::new(TokenVerifier::new(
        &config.auth.jwt_secret,
        config.auth.audience.clone(),
        config.auth.leeway_secs,
    )?);

    let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

    Ok(AppState {
        pool,
        config,
        token_verifier,
        rate_limiter,
    })
}

/// Builds the router. Fails when the auth secret is unusable.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    Ok(create_router(build_state(config, pool)?))
}

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();
    let cors = cors_layer(&config);

    // Owner routes: auth runs first, then rate limiting (needs the user id)
    let owner_routes = Router::new()
        .route(
            "/api/v1/business",
            get(business::get_business)
                .post(business::create_business)
                .put(business::update_business),
        )
        .route("/api/v1/business/design", put(business::save_design))
        .route(
            "/api/v1/business/display-design",
            get(business::display_design),
        )
        .route(
            "/api/v1/business/design-versions",
            get(design_versions::list_versions).post(design_versions::create_version),
        )
        .route(
            "/api/v1/business/design-versions/:id",
            get(design_versions::get_version)
                .patch(design_versions::update_version)
                .delete(design_versions::delete_version),
        )
        .route(
            "/api/v1/business/design-versions/:id/activate",
            post(design_versions::activate_version),
        )
        .route(
            "/api/v1/business/qr-design",
            put(design_versions::link_qr_design).delete(design_versions::unlink_qr_design),
        )
        .route(
            "/api/v1/business/categories",
            get(menu::list_categories).post(menu::create_category),
        )
        .route(
            "/api/v1/business/categories/:id",
            put(menu::update_category).delete(menu::delete_category),
        )
        .route(
            "/api/v1/business/categories/:id/items",
            post(menu::create_item),
        )
        .route(
            "/api/v1/business/items/:id",
            put(menu::update_item).delete(menu::delete_item),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Super-admin routes: auth, then rate limit, then role check
    let admin_routes = Router::new()
        .route("/api/v1/admin/businesses", get(admin::list_businesses))
        .route(
            "/api/v1/admin/businesses/:id",
            axum::routing::delete(admin::delete_business),
        )
        .route(
            "/api/v1/admin/businesses/:id/time-window",
            put(admin::set_time_window),
        )
        .route(
            "/api/v1/admin/businesses/:id/status",
            put(admin::set_status),
        )
        .route_layer(middleware::from_fn(require_super_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/public/menus/:slug", get(public::get_public_menu));

    Router::new()
        .merge(public_routes)
        .merge(owner_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
