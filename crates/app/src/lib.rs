//! HTTP surface of the workbook progress tracker.

#![forbid(unsafe_code)]

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use services::AppServices;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

/// Photos arrive as base64 strings, so requests are large.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
}

impl AppState {
    #[must_use]
    pub fn new(services: AppServices) -> Self {
        Self { services }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health::health))
        .route("/analyze", post(api::analyze::analyze))
        .route(
            "/students",
            get(api::students::list_students).post(api::students::add_student),
        )
        .route("/students/:student/dashboard", get(api::entries::dashboard))
        .route(
            "/students/:student/:category/entries",
            get(api::entries::list_entries).post(api::entries::create_entry),
        )
        .route(
            "/students/:student/:category/entries/:id",
            delete(api::entries::delete_entry),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
