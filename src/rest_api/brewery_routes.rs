//! Brewery HTTP Routes
//!
//! `GET /breweries/:id` reads the brewery first and only then bumps its
//! view counter; a counter failure drops `views` from the body but never
//! fails the read.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::warn;

use crate::observability::Event;
use crate::store::{Brewery, BreweryDetails, BreweryInput, NewBrewery, RecordKind, StoreError};

use super::errors::RestResult;
use super::parser::parse_id;
use super::response::DeletedResponse;
use super::server::ApiState;

/// Create brewery routes
pub fn brewery_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route(
            "/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

async fn list_handler(State(state): State<Arc<ApiState>>) -> RestResult<Json<Vec<Brewery>>> {
    Ok(Json(state.store.list_breweries()?))
}

async fn get_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> RestResult<Json<BreweryDetails>> {
    let id = parse_id(&id)?;
    let brewery = state
        .store
        .get_brewery(id)?
        .ok_or_else(|| StoreError::not_found(RecordKind::Brewery, id))?;

    let views = match state.views.increment(id) {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(
                event = %Event::ViewCountFailed,
                brewery_id = id,
                error = %e,
                "view counter unavailable, returning brewery without views"
            );
            None
        }
    };

    Ok(Json(BreweryDetails { brewery, views }))
}

async fn create_handler(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<NewBrewery>, JsonRejection>,
) -> RestResult<(StatusCode, Json<Brewery>)> {
    let Json(input) = body?;
    let brewery = state.store.create_brewery_with_pictures(input)?;
    Ok((StatusCode::CREATED, Json(brewery)))
}

async fn update_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    body: Result<Json<BreweryInput>, JsonRejection>,
) -> RestResult<Json<Brewery>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    Ok(Json(state.store.update_brewery(id, input)?))
}

async fn delete_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> RestResult<Json<DeletedResponse>> {
    let id = parse_id(&id)?;
    state.store.delete_brewery(id)?;
    Ok(Json(DeletedResponse { id }))
}
