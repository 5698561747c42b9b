//! Segue Store
//!
//! HTTP service owning the user roster, the sealed access tokens and the
//! song mappings the queue manager reads.
//!
//! This library exposes the router and its parts for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use config::StoreConfig;
pub use error::{Result, ServerError};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full router, everything mounted under `/api/v1`
pub fn create_router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(api::health::health))
        // Users and tokens
        .route("/users", get(api::users::list_users))
        .route("/users/token", post(api::users::create_user))
        .route("/users/:user_id", axum::routing::delete(api::users::delete_user))
        .route(
            "/users/:user_id/token",
            get(api::users::get_token).put(api::users::put_token),
        )
        // Mappings
        .route(
            "/users/:user_id/mappings",
            get(api::mappings::list_mappings).post(api::mappings::create_mapping),
        )
        .route(
            "/users/:user_id/mappings/chain",
            post(api::mappings::create_chain),
        )
        .route(
            "/users/:user_id/mappings/:mapping_id",
            axum::routing::delete(api::mappings::delete_mapping),
        );

    Router::new()
        .nest("/api/v1", routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
