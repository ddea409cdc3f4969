use anyhow::Context;
use storage::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;

use config::Config;
use features::{catalog, exam_participants, exams};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        catalog::handlers::list_disciplines,
        catalog::handlers::lookup_requirement,
        catalog::handlers::preview_score,
        exams::handlers::enroll,
        exams::handlers::recompute_exam,
        exam_participants::handlers::get_summary,
        exam_participants::handlers::change_discipline,
        exam_participants::handlers::set_result,
        exam_participants::handlers::clear_result,
        exam_participants::handlers::add_proof,
        exam_participants::handlers::add_manual_proof,
        exam_participants::handlers::remove_proof,
    ),
    components(
        schemas(
            storage::dto::catalog::DisciplineResponse,
            storage::dto::catalog::ScorePreviewRequest,
            storage::dto::catalog::ScorePreviewResponse,
            storage::dto::exam_participant::SummaryResponse,
            storage::dto::exam_participant::CategoryScore,
            storage::dto::exam_participant::ResultResponse,
            storage::dto::exam_participant::EnrollRequest,
            storage::dto::exam_participant::ChangeDisciplineRequest,
            storage::dto::exam_participant::SetResultRequest,
            storage::dto::exam_participant::AddProofRequest,
            storage::dto::exam_participant::ManualProofRequest,
            storage::dto::exam_participant::RecomputeResponse,
            storage::models::Category,
            storage::models::Direction,
            storage::models::Level,
            storage::models::Medal,
            storage::models::Requirement,
            storage::models::ExamParticipant,
        )
    ),
    tags(
        (name = "catalog", description = "Disciplines, requirement tables and score previews"),
        (name = "exams", description = "Exam enrollment"),
        (name = "exam-participants", description = "Results and rollups of an exam participant"),
        (name = "swimming-proof", description = "Swimming proof lifecycle"),
        (name = "admin", description = "Maintenance endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Sportabzeichen API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, every protected endpoint will answer 401");
    }

    let app = routes::router(db, api_keys)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
