//! Route definitions for the boss roster -- mounted at `/bosses`.
//!
//! ```text
//! GET    /                    list
//! POST   /                    upsert
//! DELETE /{name}              delete
//! POST   /{name}/kill         kill
//! POST   /{name}/unkill       unkill
//! ```

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::bosses;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bosses::list).post(bosses::upsert))
        .route("/{name}", delete(bosses::delete))
        .route("/{name}/kill", post(bosses::kill))
        .route("/{name}/unkill", post(bosses::unkill))
}
