//! User HTTP Routes
//!
//! Password hashing is CPU-bound, so creates and updates run on the
//! blocking pool.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::store::{NewUser, User, UserUpdate};

use super::errors::{RestError, RestResult};
use super::parser::parse_id;
use super::response::{MessageResponse, UserCreatedResponse};
use super::server::ApiState;

/// Create user routes
pub fn user_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_handler).post(create_handler))
        .route("/:id", put(update_handler).delete(delete_handler))
        .with_state(state)
}

async fn list_handler(State(state): State<Arc<ApiState>>) -> RestResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users()?))
}

async fn create_handler(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> RestResult<(StatusCode, Json<UserCreatedResponse>)> {
    let Json(input) = body?;
    let store = Arc::clone(&state.store);
    let user = tokio::task::spawn_blocking(move || store.create_user(input))
        .await
        .map_err(|e| RestError::Internal(e.to_string()))??;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "User added successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

async fn update_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> RestResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || store.update_user(id, input))
        .await
        .map_err(|e| RestError::Internal(e.to_string()))??;

    Ok(Json(MessageResponse::new("User updated successfully")))
}

async fn delete_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> RestResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.store.delete_user(id)?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
