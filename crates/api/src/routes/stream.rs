//! WebSocket snapshot stream -- mounted at `/stream`.

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

pub fn router() -> Router<AppState> {
    Router::new().route("/stream", get(ws::ws_handler))
}
