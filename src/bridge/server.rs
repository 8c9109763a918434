//! Bridge WebSocket Route

use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Router,
};

use super::session::{BridgeState, Session};

/// Path of the WebSocket endpoint
pub const SOCKET_PATH: &str = "/socket";

/// Create the bridge router
pub fn bridge_routes(state: Arc<BridgeState>) -> Router {
    Router::new()
        .route(SOCKET_PATH, get(socket_handler))
        .with_state(state)
}

/// Handle WebSocket upgrade request
async fn socket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<BridgeState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| Session::run(socket, state))
}
