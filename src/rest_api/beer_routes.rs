//! Beer HTTP Routes
//!
//! The only listing with filtering and pagination.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::store::{Beer, BeerInput, BeerQuery, Page};

use super::errors::RestResult;
use super::parser::parse_id;
use super::response::{BeerCreatedResponse, MessageResponse};
use super::server::ApiState;

/// Create beer routes
pub fn beer_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route("/:id", put(update_handler).delete(delete_handler))
        .with_state(state)
}

async fn list_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<HashMap<String, String>>,
) -> RestResult<Json<Page<Beer>>> {
    let query = BeerQuery::parse(&params)?;
    Ok(Json(state.store.list_beers(&query)?))
}

async fn create_handler(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<BeerInput>, JsonRejection>,
) -> RestResult<(StatusCode, Json<BeerCreatedResponse>)> {
    let Json(input) = body?;
    let beer = state.store.create_beer(input)?;
    Ok((
        StatusCode::CREATED,
        Json(BeerCreatedResponse {
            message: "Beer added successfully".to_string(),
            beer_id: beer.id,
        }),
    ))
}

async fn update_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    body: Result<Json<BeerInput>, JsonRejection>,
) -> RestResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    state.store.update_beer(id, input)?;
    Ok(Json(MessageResponse::new("Beer updated successfully")))
}

async fn delete_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> RestResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.store.delete_beer(id)?;
    Ok(Json(MessageResponse::new("Beer deleted successfully")))
}
