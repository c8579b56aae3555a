//! # Cirrus CLI Library
//!
//! The `cirrus` command line: a thin caller over `cirrus-db` that stands in
//! for the storefront pages (catalog, cart, checkout, invoice, reports).
//!
//! ## Module Organization
//! ```text
//! cirrus_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── AppConfig: defaults → cirrus.toml → CIRRUS_* env
//! ├── cli/
//! │   ├── mod.rs      ◄─── clap definitions and dispatch
//! │   ├── account.rs  ◄─── register, login, logout, reset-password, dashboard
//! │   ├── catalog.rs  ◄─── products, product
//! │   ├── cart.rs     ◄─── add, cart, set-qty, remove, clear
//! │   ├── checkout.rs ◄─── checkout
//! │   └── report.rs   ◄─── invoice, invoices, user-invoices, stats
//! ├── prompt.rs       ◄─── stdin questions (password retry, underpayment)
//! ├── render.rs       ◄─── text views of carts, invoices, reports
//! └── error.rs        ◄─── AppError for commands
//! ```
//!
//! Every invocation is one command against the persisted state; the
//! logged-in user lives in the store, so `login` then `add` works across
//! separate runs.

pub mod cli;
pub mod config;
pub mod error;
pub mod prompt;
pub mod render;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cirrus_db::{Database, DbConfig};

use cli::Cli;
use config::AppConfig;
use error::AppResult;

/// Parses the command line, runs one command and reports the outcome.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                         Command Startup                                 │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • stderr, env filter (RUST_LOG overrides)                           │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → cirrus.toml / --config → CIRRUS_* → validation         │
/// │                                                                         │
/// │  3. Open Database ────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │                                                                         │
/// │  4. Run Command ──────────────────────────────────────────────────────► │
/// │     • output on stdout, errors on stderr, non-zero exit on failure      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if err.is_fatal() {
                error!(code = err.code.as_str(), "Storage lost; ending session");
            }
            eprintln!("{}", err);
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> AppResult<String> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let db_path = config.database_path()?;
    info!(db_path = %db_path.display(), "Opening database");

    let db = Database::open(DbConfig::new(db_path), config.shop.clone()).await?;
    let result = cli.command.run(&db).await;
    db.close().await;

    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cirrus_db=trace` - Show trace for the storage layer only
/// - Default: WARN, INFO for cirrus crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cirrus=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
