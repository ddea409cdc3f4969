use axum::{Router, middleware, routing::post};
use storage::Database;

use super::handlers::{enroll, recompute_exam};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/:exam_id/participants", post(enroll))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}

pub fn admin_routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/exams/:exam_id/recompute", post(recompute_exam))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
