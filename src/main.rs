use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use statement_ingest::{
    load_config, read_csv_file, ImportPipeline, ImportPolicy, IngestConfig, SqliteStore,
};

#[derive(Parser)]
#[command(
    name = "statement-ingest",
    version,
    about = "Normalize, classify and de-duplicate exported bank statements."
)]
struct Cli {
    /// JSON config file (thresholds, custom category rules)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a CSV statement and print the batch result as JSON.
    Inspect {
        /// Path to the CSV export
        file: PathBuf,
    },
    /// Normalize a CSV statement and store it, skipping duplicates.
    Import {
        /// Path to the CSV export
        file: PathBuf,
        /// SQLite database (created if missing)
        #[arg(long)]
        db: PathBuf,
        /// Owner of the imported transactions
        #[arg(long)]
        user: String,
        /// Store duplicates too
        #[arg(long)]
        import_all: bool,
        /// Override the fuzzy duplicate threshold (0-100)
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "statement_ingest=debug"
    } else {
        "statement_ingest=info"
    };

    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => IngestConfig::default(),
    };

    match cli.command {
        Commands::Inspect { file } => run_inspect(&config, &file),
        Commands::Import {
            file,
            db,
            user,
            import_all,
            threshold,
        } => {
            if let Some(t) = threshold {
                config.duplicates.threshold = t;
                config.validate().context("Invalid --threshold")?;
            }
            let policy = if import_all {
                ImportPolicy::ImportAll
            } else {
                ImportPolicy::SkipDuplicates
            };
            run_import(&config, &file, &db, &user, policy)
        }
    }
}

fn run_inspect(config: &IngestConfig, file: &Path) -> Result<()> {
    let grid = read_csv_file(file)
        .with_context(|| format!("Failed to read CSV file {}", file.display()))?;
    let normalizer = config.normalizer().context("Failed to build category rules")?;

    let result = normalizer.normalize_grid(&grid);
    let json = serde_json::to_string_pretty(&result).context("Failed to serialize batch")?;
    println!("{}", json);
    Ok(())
}

fn run_import(
    config: &IngestConfig,
    file: &Path,
    db: &Path,
    user: &str,
    policy: ImportPolicy,
) -> Result<()> {
    let grid = read_csv_file(file)
        .with_context(|| format!("Failed to read CSV file {}", file.display()))?;
    let mut store = SqliteStore::open(db)
        .with_context(|| format!("Failed to open database {}", db.display()))?;
    let pipeline = ImportPipeline::from_config(config).context("Failed to build pipeline")?;

    let outcome = pipeline
        .import_grid(&grid, &mut store, user, policy)
        .context("Import failed")?;

    if outcome.batch.requires_manual_review {
        println!("⚠️  Nothing imported: manual review required");
        if let Some(message) = &outcome.batch.message {
            println!("   {}", message);
        }
        return Ok(());
    }

    println!("📂 {}", file.display());
    println!("✓ Valid transactions: {}", outcome.batch.transactions.len());
    println!("✓ Needs review:       {}", outcome.batch.invalid_transactions.len());
    println!("✓ New:                {}", outcome.report.new_transactions.len());
    println!("✓ Duplicates:         {}", outcome.report.duplicate_indices().len());
    println!("💾 Inserted:          {}", outcome.inserted);
    println!(
        "🔍 Stored for {}: {}",
        user,
        store.count(user).context("Failed to count stored transactions")?
    );

    Ok(())
}
