use clap::{Parser, Subcommand};
use importer::{
    CanonicalFileSource, CsvSource, RequirementSource,
    canonical::{
        models::RequirementTable, transformer::CanonicalTransformer,
        validator::CanonicalValidator,
    },
};
use sqlx::postgres::PgPoolOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sportabzeichen-import")]
#[command(about = "Sportabzeichen requirement table importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a `;` separated requirement table for one exam year
    Csv {
        file: PathBuf,

        #[arg(long)]
        year: i32,

        #[arg(long)]
        validate_only: bool,

        /// Write the parsed table as canonical JSON instead of importing it
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Import a requirement table in canonical JSON
    Canonical {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Import every canonical JSON file of a directory
    BulkImport {
        #[arg(long, default_value = "./imports")]
        directory: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "sportabzeichen_import={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = cli.database_url.as_deref();

    match cli.command {
        Commands::Csv {
            file,
            year,
            validate_only,
            export,
        } => {
            let source = CsvSource::new(file, year);
            match export {
                Some(output) => export_to_canonical(&source, &output).await?,
                None => handle_import(&source, validate_only, database_url).await?,
            }
        }
        Commands::Canonical {
            file,
            validate_only,
        } => {
            let source = CanonicalFileSource::new(file);
            handle_import(&source, validate_only, database_url).await?;
        }
        Commands::BulkImport {
            directory,
            validate_only,
        } => {
            handle_bulk_import(directory, validate_only, database_url).await?;
        }
    }

    Ok(())
}

async fn handle_import(
    source: &dyn RequirementSource,
    validate_only: bool,
    database_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading {}", source.describe());
    let table = source.load().await?;

    tracing::info!(
        "Loaded {} discipline(s) for {} (v{})",
        table.disciplines.len(),
        table.year,
        table.format_version
    );

    tracing::info!("Validating requirement table...");
    let validation_report = CanonicalValidator::validate(&table)?;
    validation_report.log_warnings();
    tracing::info!("✓ Validation successful!");

    if validate_only {
        return Ok(());
    }

    let pool = connect(database_url).await?;
    import_table(&pool, &table).await
}

async fn handle_bulk_import(
    directory: PathBuf,
    validate_only: bool,
    database_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Scanning directory for canonical JSON files: {}", directory.display());

    let mut json_files = Vec::new();
    let mut entries = tokio::fs::read_dir(&directory).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            json_files.push(path);
        }
    }

    if json_files.is_empty() {
        tracing::warn!("No JSON files found in {}", directory.display());
        return Ok(());
    }

    json_files.sort();
    tracing::info!("Found {} canonical JSON file(s)", json_files.len());

    let pool = if validate_only {
        None
    } else {
        Some(connect(database_url).await?)
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for (idx, file_path) in json_files.iter().enumerate() {
        tracing::info!("[{}/{}] Processing: {}", idx + 1, json_files.len(), file_path.display());

        match process_canonical_file(file_path, pool.as_ref()).await {
            Ok(()) => {
                success_count += 1;
                tracing::info!("  ✓ Success");
            }
            Err(e) => {
                error_count += 1;
                tracing::error!("  ✗ Error: {}", e);
            }
        }
    }

    tracing::info!("Summary: {} succeeded, {} failed", success_count, error_count);

    if error_count > 0 {
        return Err(format!("{} file(s) failed to import", error_count).into());
    }

    Ok(())
}

async fn process_canonical_file(
    file_path: &Path,
    pool: Option<&sqlx::PgPool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = CanonicalFileSource::new(file_path).load().await?;

    let validation_report = CanonicalValidator::validate(&table)?;
    for warning in &validation_report.warnings {
        tracing::warn!("  {}", warning);
    }

    if let Some(pool) = pool {
        import_table(pool, &table).await?;
    }

    Ok(())
}

async fn import_table(
    pool: &sqlx::PgPool,
    table: &RequirementTable,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Importing {} discipline(s) to database...", table.disciplines.len());
    let summary = CanonicalTransformer::new(pool)
        .import_to_database(table)
        .await?;

    tracing::info!(
        "✓ Import completed: {} discipline(s), {} requirement row(s)",
        summary.disciplines,
        summary.requirements
    );
    Ok(())
}

async fn connect(database_url: Option<&str>) -> Result<sqlx::PgPool, Box<dyn std::error::Error>> {
    let database_url = database_url.ok_or("DATABASE_URL is required unless --validate-only is set")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

async fn export_to_canonical(
    source: &dyn RequirementSource,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = source.load().await?;
    CanonicalValidator::validate(&table)?.log_warnings();

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(&table)?;
    tokio::fs::write(output, json).await?;

    tracing::info!("Exported to: {}", output.display());
    tracing::info!("Review and edit if needed, then import with:");
    tracing::info!("   sportabzeichen-import canonical {}", output.display());

    Ok(())
}
