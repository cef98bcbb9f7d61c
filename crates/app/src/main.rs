use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use app::{AppState, build_router};
use clap::{Args, Parser, Subcommand};
use services::{AppServices, Clock, DEFAULT_OCR_API_URL, OcrConfig};
use tracing::{info, warn};
use tracker_core::model::{Category, EntryDraft};

#[derive(Debug, Parser)]
#[command(name = "app", version, about = "Workbook progress tracker")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Options for `serve`, which runs when no subcommand is given.
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Write a small demonstration history for one student.
    Seed(SeedArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// SQLite URL or file path.
    #[arg(long, env = "TRACKER_DB_URL", default_value = "sqlite:tracker.sqlite3")]
    db: String,

    #[arg(long, env = "TRACKER_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// OCR.space API key; `/analyze` fails until one is set.
    #[arg(long, env = "OCR_KEY", hide_env_values = true)]
    ocr_key: Option<String>,

    #[arg(long, env = "OCR_API_URL", default_value = DEFAULT_OCR_API_URL)]
    ocr_api_url: String,
}

#[derive(Debug, Args)]
struct SeedArgs {
    /// SQLite URL or file path.
    #[arg(long, env = "TRACKER_DB_URL", default_value = "sqlite:tracker.sqlite3")]
    db: String,

    /// Student to create and fill with entries.
    #[arg(long, default_value = "Demo")]
    student: String,
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }

    Ok(())
}

async fn open_services(db: &str, ocr: Option<OcrConfig>) -> Result<AppServices> {
    let db_url = normalize_sqlite_url(db);
    prepare_sqlite_file(&db_url)?;
    info!("Database: {db_url}");
    AppServices::new_sqlite(&db_url, Clock::default_clock(), ocr)
        .await
        .context("opening database")
}

async fn serve(args: ServeArgs) -> Result<()> {
    let ocr = args
        .ocr_key
        .filter(|key| !key.trim().is_empty())
        .map(|api_key| OcrConfig {
            api_url: args.ocr_api_url.clone(),
            api_key,
        });
    if ocr.is_none() {
        warn!("OCR_KEY is not set; /analyze will fail until it is configured");
    }

    let services = open_services(&args.db, ocr).await?;
    let app = build_router(AppState::new(services));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn seed(args: SeedArgs) -> Result<()> {
    let services = open_services(&args.db, None).await?;

    let students = services.students();
    if !students.list().await?.iter().any(|name| name == args.student.trim()) {
        students.add(&args.student).await?;
    }

    let progress = services.progress();
    let history: [(&str, &str, i64, &str); 3] = [
        ("A", "1", 6, "1/8/2024"),
        ("A", "2", 4, "1/15/2024"),
        ("B", "1", 1, "1/22/2024"),
    ];
    for category in Category::ALL {
        for (level, book, errors, date) in history {
            progress
                .record_entry(
                    &args.student,
                    category,
                    EntryDraft {
                        level: level.to_string(),
                        book: book.to_string(),
                        errors: Some(errors),
                        date: Some(date.to_string()),
                    },
                )
                .await?;
        }
    }

    info!(
        student = args.student.trim(),
        entries = history.len() * Category::ALL.len(),
        "seeded demonstration history"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting progress tracker v{}", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Command::Serve(cli.serve)) {
        Command::Serve(args) => serve(args).await,
        Command::Seed(args) => seed(args).await,
    }
}
