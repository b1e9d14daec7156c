use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use warikan::application::engine::Ledger;
use warikan::domain::ports::ProjectStoreBox;
use warikan::domain::project::{Project, Workspace};
use warikan::error::LedgerError;
use warikan::infrastructure::in_memory::InMemoryProjectStore;
use warikan::interfaces::csv::report_writer::ReportWriter as CsvReportWriter;
use warikan::interfaces::json::export::export_workspace;
use warikan::interfaces::json::workspace_reader::WorkspaceReader;
use warikan::interfaces::text::report_writer::ReportWriter as TextReportWriter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Text,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace or project JSON file. Uses the sample workspace when omitted.
    input: Option<PathBuf>,

    /// Id of the project to settle. Defaults to the workspace's active project.
    #[arg(long)]
    project: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Directory to write a dated JSON export of the workspace into.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Refuse to compute when the project references unknown members or
    /// categories.
    #[arg(long)]
    strict: bool,

    /// Default log filter; RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<ProjectStoreBox> {
    use warikan::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(&path).into_diagnostic()?;
            tracing::info!(path = %path.display(), "using persistent storage");
            Ok(Box::new(store))
        }
        None => Ok(Box::new(InMemoryProjectStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<ProjectStoreBox> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryProjectStore::new()))
}

/// `--project` must exist; otherwise the workspace's active project, falling
/// back to the first stored one.
async fn resolve_project(
    store: &ProjectStoreBox,
    requested: Option<String>,
    active: Option<String>,
) -> Result<Project, LedgerError> {
    if let Some(id) = requested {
        let found = store.get(&id).await?;
        return found.ok_or(LedgerError::ProjectNotFound(id));
    }
    if let Some(id) = active
        && let Some(project) = store.get(&id).await?
    {
        return Ok(project);
    }
    store
        .get_all()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| LedgerError::ProjectNotFound("(no projects)".to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let store = open_store(cli.db_path)?;

    let workspace = match cli.input {
        Some(path) => {
            let file = File::open(&path).into_diagnostic()?;
            Some(WorkspaceReader::new(file).read().into_diagnostic()?)
        }
        None if store.get_all().await.into_diagnostic()?.is_empty() => {
            tracing::info!("no input given, using the sample workspace");
            Some(Workspace::load_or_sample(None))
        }
        None => None,
    };

    let active = match workspace {
        Some(workspace) => {
            for project in workspace.projects {
                store.store(project).await.into_diagnostic()?;
            }
            workspace.active_project_id
        }
        None => None,
    };

    let project = resolve_project(&store, cli.project, active)
        .await
        .into_diagnostic()?;

    let issues = project.validation_issues();
    for issue in &issues {
        tracing::warn!(project = %project.id, "{issue}");
    }
    if cli.strict && !issues.is_empty() {
        return Err(LedgerError::Validation(issues)).into_diagnostic();
    }

    let report = Ledger::new(&project).report();
    tracing::info!(
        project = %project.id,
        members = report.balances.balance.len(),
        transfers = report.settlement.len(),
        "ledger computed"
    );

    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => CsvReportWriter::new(stdout.lock())
            .write_report(&project, &report)
            .into_diagnostic()?,
        OutputFormat::Text => TextReportWriter::new(stdout.lock())
            .write_report(&project, &report)
            .into_diagnostic()?,
    }

    if let Some(dir) = cli.export_dir {
        let mut snapshot = Workspace::single(project);
        snapshot.projects = store.get_all().await.into_diagnostic()?;
        let today = chrono::Local::now().date_naive();
        export_workspace(&dir, &snapshot, today).into_diagnostic()?;
    }

    Ok(())
}
