//! HTTP API for the people directory
//!
//! The router is transport plumbing only: handlers translate query/body
//! values into core types, call the injected collaborators, and map core
//! errors onto status codes. All business rules live below this layer.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::database::PersonRepositoryTrait;
use crate::enrich::Enricher;

/// Application state
///
/// Collaborators are trait objects injected at construction; nothing in the
/// API layer reaches for globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PersonRepositoryTrait>,
    pub enricher: Arc<dyn Enricher>,
}

impl AppState {
    pub fn new(store: Arc<dyn PersonRepositoryTrait>, enricher: Arc<dyn Enricher>) -> Self {
        Self { store, enricher }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route(
            "/api/people",
            get(handlers::list_people).post(handlers::create_person),
        )
        .route(
            "/api/people/:id",
            get(handlers::get_person)
                .patch(handlers::update_person)
                .delete(handlers::delete_person),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
