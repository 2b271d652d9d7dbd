//! tusk CLI
//!
//! Command-line tool that turns a directory of SQL files into typed
//! TypeScript modules.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tokio_postgres::{GenericClient, NoTls};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use tusk_cli::{discover_sql_files, format_warnings, generate_module, CliError};
use tusk_core::annotate_statement;
use tusk_postgres::{describe_statement, PgSchemaResolver};

/// Typed TypeScript from raw SQL.
#[derive(Parser)]
#[command(name = "tusk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database connection string used to describe statements.
    #[arg(short, long, env = "DATABASE_URL")]
    database: String,

    /// Verify that generated files are up to date instead of writing them.
    #[arg(long)]
    check: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Directory to scan for SQL files, one statement per file.
    directory: PathBuf,
}

/// What happened to one SQL file.
enum Outcome {
    Written,
    UpToDate,
    Stale,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Connect to database
    let (client, connection) = tokio_postgres::connect(&cli.database, NoTls).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            warn!("connection error: {err}");
        }
    });

    let resolver = PgSchemaResolver::new(&client);
    let files = discover_sql_files(&cli.directory)?;
    info!(
        "Found {} SQL file(s) under {}",
        files.len(),
        cli.directory.display()
    );

    let mut fatal = 0usize;
    let mut stale = 0usize;
    for path in &files {
        debug!("Processing {}", path.display());
        match process_file(&client, &resolver, path, cli.check, cli.verbose).await {
            Ok(Outcome::Written) => info!("Wrote {}", path.with_extension("ts").display()),
            Ok(Outcome::UpToDate) => debug!("Up to date: {}", path.with_extension("ts").display()),
            Ok(Outcome::Stale) => {
                stale += 1;
                warn!("Stale: {}", path.with_extension("ts").display());
            }
            Err(err) => {
                fatal += 1;
                warn!("{}: {err}", path.display());
            }
        }
    }

    if cli.check {
        info!(
            "Checked {} file(s): {} stale, {} failed",
            files.len(),
            stale,
            fatal
        );
    } else {
        info!("Processed {} file(s): {} failed", files.len(), fatal);
    }

    if fatal > 0 || (cli.check && stale > 0) {
        std::process::exit(1);
    }
    Ok(())
}

/// Runs one SQL file through describe, inference and code generation,
/// then writes (or checks) the TypeScript module next to it.
async fn process_file<C: GenericClient>(
    client: &C,
    resolver: &PgSchemaResolver<'_, C>,
    path: &Path,
    check: bool,
    verbose: bool,
) -> Result<Outcome, CliError> {
    let sql = fs::read_to_string(path).map_err(|source| CliError::io(path, source))?;
    let description = describe_statement(client, &sql).await?;
    let annotated = annotate_statement(resolver, description).await?;

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let module = generate_module(resolver, &stem, &annotated.payload).await?;

    let mut warnings = annotated.warnings;
    warnings.extend(module.warnings);
    let report = format_warnings(&warnings, verbose);
    if !report.is_empty() {
        eprintln!("\n{}:", path.display());
        eprint!("{report}");
    }

    let out_path = path.with_extension("ts");
    if check {
        let current = match fs::read_to_string(&out_path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(CliError::io(&out_path, err)),
        };
        if current == module.payload {
            Ok(Outcome::UpToDate)
        } else {
            Ok(Outcome::Stale)
        }
    } else {
        fs::write(&out_path, module.payload).map_err(|source| CliError::io(&out_path, source))?;
        Ok(Outcome::Written)
    }
}
