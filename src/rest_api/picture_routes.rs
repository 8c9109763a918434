//! Picture HTTP Routes
//!
//! Reads expose the resolved display URL next to the stored reference.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::pictures::{resolve_display_url, PictureUrl, ResolvedPicture};
use crate::store::PictureInput;

use super::errors::RestResult;
use super::parser::parse_id;
use super::response::DeletedResponse;
use super::server::ApiState;

/// Create picture routes
pub fn picture_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route(
            "/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

async fn list_handler(
    State(state): State<Arc<ApiState>>,
) -> RestResult<Json<Vec<ResolvedPicture>>> {
    let pictures = state
        .store
        .list_pictures()?
        .into_iter()
        .map(ResolvedPicture::from)
        .collect();
    Ok(Json(pictures))
}

/// Unknown ids answer `{ "data": null }` rather than 404.
async fn get_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> RestResult<Json<PictureUrl>> {
    let id = parse_id(&id)?;
    let picture = state.store.get_picture(id)?;
    let data = resolve_display_url(picture.as_ref().map(|p| p.data.as_str()));
    Ok(Json(PictureUrl { data }))
}

async fn create_handler(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<PictureInput>, JsonRejection>,
) -> RestResult<(StatusCode, Json<ResolvedPicture>)> {
    let Json(input) = body?;
    let picture = state.store.create_picture(input)?;
    Ok((StatusCode::CREATED, Json(ResolvedPicture::from(picture))))
}

async fn update_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    body: Result<Json<PictureInput>, JsonRejection>,
) -> RestResult<Json<ResolvedPicture>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let picture = state.store.update_picture(id, input)?;
    Ok(Json(ResolvedPicture::from(picture)))
}

async fn delete_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> RestResult<Json<DeletedResponse>> {
    let id = parse_id(&id)?;
    state.store.delete_picture(id)?;
    Ok(Json(DeletedResponse { id }))
}
