use axum::Router;
use storage::Database;

use crate::features::{catalog, exam_participants, exams};
use crate::middleware::auth::ApiKeys;

/// All API routes, mounted under `/api`
pub fn router(db: Database, api_keys: ApiKeys) -> Router {
    let api = Router::new()
        .merge(catalog::routes::routes())
        .nest("/exams", exams::routes::routes(api_keys.clone()))
        .nest(
            "/exam-participants",
            exam_participants::routes::routes(api_keys.clone()),
        )
        .nest("/admin", exams::routes::admin_routes(api_keys));

    Router::new().nest("/api", api).with_state(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const KEY: &str = "test-key";

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        router(Database::from_pool(pool), ApiKeys::from_comma_separated(KEY))
    }

    fn json_request(method: &str, uri: &str, body: &str, auth: bool) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if auth {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {KEY}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    const EP: &str = "6f1c2b9e-8a43-4a8e-9a57-2f0a5d1c3b11";
    const DISCIPLINE: &str = "0b8e4d2a-51f7-4c3e-8d6a-7e9f1a2b3c44";

    #[tokio::test]
    async fn test_mutations_require_api_key() {
        let uri = format!("/api/exam-participants/{EP}/results/{DISCIPLINE}");
        let response = app()
            .oneshot(json_request("PUT", &uri, r#"{"value": "12.5"}"#, false))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_api_key_is_rejected() {
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/exam-participants/{EP}/swimming-proof"))
            .header(header::AUTHORIZATION, "Bearer not-a-key")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_recompute_requires_api_key() {
        let uri = format!("/api/admin/exams/{EP}/recompute");
        let response = app()
            .oneshot(json_request("POST", &uri, "", false))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_category_is_bad_request() {
        let uri = format!("/api/exam-participants/{EP}/categories/juggling");
        let response = app()
            .oneshot(json_request("PUT", &uri, r#"{"discipline_id": null}"#, true))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_category_filter_is_bad_request() {
        let request = Request::builder()
            .uri("/api/disciplines?category=juggling")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let request = Request::builder()
            .uri("/api/exam-participants/not-a-uuid/summary")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_manual_source_fails_validation() {
        let uri = format!("/api/exam-participants/{EP}/swimming-proof/manual");
        let response = app()
            .oneshot(json_request("POST", &uri, r#"{"source": ""}"#, true))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_result_value_beyond_column_is_bad_request() {
        let uri = format!("/api/exam-participants/{EP}/results/{DISCIPLINE}");
        let response = app()
            .oneshot(json_request("PUT", &uri, r#"{"value": "100000000"}"#, true))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_value_beyond_column_is_bad_request() {
        let body = format!(
            r#"{{"discipline_id": "{DISCIPLINE}", "value": "100000000", "year": 2025, "age": 30}}"#
        );
        let response = app()
            .oneshot(json_request("POST", "/api/scoring/preview", &body, false))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lookup_rejects_out_of_range_year() {
        let request = Request::builder()
            .uri(format!(
                "/api/requirements/lookup?discipline_id={DISCIPLINE}&year=1900&age=10"
            ))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
