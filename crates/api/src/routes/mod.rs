pub mod bosses;
pub mod health;
pub mod stream;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /bosses                       list (GET, public), upsert (POST)
/// /bosses/{name}                delete (DELETE)
/// /bosses/{name}/kill           record a kill (POST)
/// /bosses/{name}/unkill         clear a kill (POST)
///
/// /stream                       WebSocket snapshot feed (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/bosses", bosses::router())
        .merge(stream::router())
}
