//! Greetings Backend Library
//!
//! Bearer-token authentication in front of a small greetings API.
//! Exposes the router so the binary and the integration tests share it.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;

use axum::{
    handler::Handler,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::auth::{
    api as auth_api, jwt_auth_filter, require_authentication, AuthFilter, AuthState, JwtHandler,
    UserDirectory,
};

/// Build the full application router.
///
/// Every request passes the request logger and the JWT filter; the greeting
/// routes and any unmatched path additionally require an authenticated
/// identity.
pub fn app(users: Arc<dyn UserDirectory>, jwt_handler: Arc<JwtHandler>) -> Router {
    let auth_router = Router::new()
        .route("/api/v1/auth/authenticate", post(auth_api::authenticate))
        .with_state(AuthState::new(users.clone(), jwt_handler.clone()));

    let protected_routes = Router::new()
        .route("/api/v1/greetings", get(api::say_hello))
        .route("/api/v1/greetings/say-good-bye", get(api::say_good_bye))
        .route_layer(axum_middleware::from_fn(require_authentication));

    let public_routes = Router::new().route("/health", get(api::health_check));

    let filter = AuthFilter::new(jwt_handler, users);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .fallback(api::not_found.layer(axum_middleware::from_fn(require_authentication)))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum_middleware::from_fn(middleware::request_logging))
                .layer(axum_middleware::from_fn_with_state(filter, jwt_auth_filter)),
        )
}
