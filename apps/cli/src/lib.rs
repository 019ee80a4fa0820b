//! # cotizador CLI Library
//!
//! Everything behind the `cotizador` binary; `main.rs` only parses flags and
//! maps the result to an exit status.
//!
//! ## Module Organization
//! ```text
//! cotizador_cli/
//! ├── lib.rs          ◄─── You are here (tracing, dispatch)
//! ├── cli.rs          ◄─── clap definitions, input files
//! ├── generator.rs    ◄─── Validate → issue → compose → render → reset
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── form.rs     ◄─── Quotation form being filled in
//! │   ├── config.rs   ◄─── Layered configuration
//! │   └── db.rs       ◄─── Counter store (SQLite or memory)
//! ├── commands/
//! │   ├── generate.rs
//! │   ├── counter.rs
//! │   └── preview.rs
//! └── error.rs        ◄─── AppError with codes and exit status
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize logging (stderr, RUST_LOG or --verbose)                  │
//! │  2. Resolve ConfigState (flags > env > config.toml > defaults)          │
//! │  3. Open the counter store, running migrations                          │
//! │  4. Dispatch the command, writing results to stdout                     │
//! │  5. Close the store                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod generator;
pub mod state;

use chrono::NaiveDate;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use error::AppError;
use state::{ConfigState, DbState};

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - Default: `info`, or `debug` with `--verbose`
/// - `RUST_LOG` overrides both, e.g. `RUST_LOG=cotizador_db=trace`
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "debug,sqlx=warn"
    } else {
        "info,sqlx=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Quotation date: today, local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Runs a parsed command line, writing command output to stdout.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config = ConfigState::load(&cli.overrides())?;
    debug!(?config, "Configuration loaded");

    let db = DbState::open(&config.storage).await?;
    info!(storage = ?config.storage, "Counter store ready");

    let mut stdout = std::io::stdout();
    let result = match &cli.command {
        Command::Generate(args) => {
            commands::generate::run(&config, &db, args, today(), &mut stdout).await
        }
        Command::Counter => commands::counter::run(&db, &mut stdout).await,
        Command::Preview(args) => {
            commands::preview::run(&config, &db, args, today(), &mut stdout).await
        }
    };

    db.close().await;
    result
}
