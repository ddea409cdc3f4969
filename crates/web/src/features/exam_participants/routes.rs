use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    add_manual_proof, add_proof, change_discipline, clear_result, get_summary, remove_proof,
    set_result,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/:id/categories/:category", put(change_discipline))
        .route("/:id/results/:discipline_id", put(set_result).delete(clear_result))
        .route("/:id/swimming-proof", post(add_proof).delete(remove_proof))
        .route("/:id/swimming-proof/manual", post(add_manual_proof))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:id/summary", get(get_summary))
        .merge(protected)
}
