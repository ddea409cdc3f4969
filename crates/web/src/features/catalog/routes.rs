use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{list_disciplines, lookup_requirement, preview_score};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/disciplines", get(list_disciplines))
        .route("/requirements/lookup", get(lookup_requirement))
        .route("/scoring/preview", post(preview_score))
}
