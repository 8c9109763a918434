//! # REST API Router
//!
//! Mounts the four resource routers over a shared store and view counter.

use std::sync::Arc;

use axum::Router;

use crate::store::{InMemoryStore, InMemoryViewCounter, ResourceStore, ViewCounter};

use super::beer_routes::beer_routes;
use super::brewery_routes::brewery_routes;
use super::picture_routes::picture_routes;
use super::user_routes::user_routes;

/// Shared state for the resource handlers
pub struct ApiState {
    pub store: Arc<dyn ResourceStore>,
    pub views: Arc<dyn ViewCounter>,
}

impl ApiState {
    pub fn new(store: Arc<dyn ResourceStore>, views: Arc<dyn ViewCounter>) -> Self {
        Self { store, views }
    }

    /// State backed by the bundled in-memory store and counter
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryViewCounter::new()),
        )
    }
}

/// Build the resource router
pub fn api_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .nest("/breweries", brewery_routes(Arc::clone(&state)))
        .nest("/pictures", picture_routes(Arc::clone(&state)))
        .nest("/beers", beer_routes(Arc::clone(&state)))
        .nest("/users", user_routes(state))
}
