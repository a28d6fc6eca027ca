//! Table access control CLI
//!
//! Evaluates permission checks against the ACL records in a configuration file.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tables_authz::{
    access_control::{
        AccessChecker, PermissionResolver, Scope, StaticIdentity, TableId, TablePermission,
        TableRole, TablesUserPermissions, UserIdentity,
    },
    config::{AppConfig, LogFormat, LoggingConfig, load_config},
    error::{AccessError, AccessResult},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Table access control - evaluate table and row permission checks
#[derive(Parser, Debug)]
#[command(name = "tables-authz")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "TABLES_AUTHZ_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides logging.level
    #[arg(long, env = "TABLES_AUTHZ_LOG_LEVEL")]
    log_level: Option<String>,

    /// Identity of the acting user (omit for an anonymous caller)
    #[arg(short, long, env = "TABLES_AUTHZ_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the user's resolved permissions on a table
    Permissions {
        #[arg(short, long)]
        table: String,
    },

    /// Check that the user holds a permission on a table
    Check {
        #[arg(short, long)]
        table: String,
        /// Permission name, e.g. READ_ROW
        permission: TablePermission,
    },

    /// Print whether the user holds a permission on a table
    Has {
        #[arg(short, long)]
        table: String,
        permission: TablePermission,
    },

    /// Check access to a row given its filter scope
    Filter {
        #[arg(short, long)]
        table: String,
        /// Unfiltered permission guarding the row, e.g. UNFILTERED_READ
        permission: TablePermission,
        /// Row identifier
        #[arg(long)]
        row: String,
        /// Row filter scope: default, empty, user, user:<id> or group:<name>
        #[arg(long)]
        scope: Option<Scope>,
    },

    /// List the scopes the user participates in
    Scopes,

    /// List the available roles and their permissions
    Roles,
}

/// Load a `.env` file, then parse `argv`
///
/// The file must be loaded first so clap's `env` fallbacks see its values.
/// Variables already set in the environment take precedence over the file.
/// `env_file` of `None` searches the working directory and its parents.
fn parse_args<I, T>(env_file: Option<&Path>, argv: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    // A missing .env file is not an error
    if let Some(path) = env_file {
        dotenvy::from_path(path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
    Args::try_parse_from(argv)
}

fn init_logging(logging: &LoggingConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(&logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Print the outcome of a check, returning whether it allowed access
fn report(outcome: AccessResult<()>) -> anyhow::Result<bool> {
    match outcome {
        Ok(()) => {
            println!("allowed");
            Ok(true)
        }
        Err(AccessError::PermissionDenied(denied)) => {
            println!("denied: {}", denied);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

async fn run(args: Args, config: AppConfig) -> anyhow::Result<bool> {
    let store = Arc::new(
        config
            .acl_store()
            .inspect_err(|e| error!(error = %e, "Failed to build ACL store"))?,
    );
    info!(acls = store.len(), "Loaded table ACLs");

    let resolver = PermissionResolver::new(store);
    let identity = StaticIdentity::new(args.user.map(UserIdentity::new));
    let mut permissions = TablesUserPermissions::for_current_user(&identity, resolver.clone());

    match args.command {
        Command::Permissions { table } => {
            let checker = AccessChecker::for_current_user(TableId::new(table), &identity, resolver);
            for permission in checker.permissions().await?.iter() {
                println!("{}", permission);
            }
            Ok(true)
        }
        Command::Check { table, permission } => report(
            permissions
                .check_permission(&TableId::new(table), permission)
                .await,
        ),
        Command::Has { table, permission } => {
            let granted = permissions
                .has_permission(&TableId::new(table), permission)
                .await?;
            println!("{}", granted);
            Ok(granted)
        }
        Command::Filter {
            table,
            permission,
            row,
            scope,
        } => report(
            permissions
                .check_filter(&TableId::new(table), permission, &row, scope.as_ref())
                .await,
        ),
        Command::Scopes => {
            for scope in permissions.scopes().await? {
                println!("{}", scope);
            }
            Ok(true)
        }
        Command::Roles => {
            for role in TableRole::all() {
                let names: Vec<&str> = role.permissions().iter().map(|p| p.as_str()).collect();
                println!("{}: {}", role, role.description());
                println!("  {}", names.join(", "));
            }
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let args = parse_args(None, std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Load configuration, then initialize logging from it
    let config = load_config(args.config.as_deref());
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_logging(&logging, args.log_level.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Starting tables-authz");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::from(2);
        }
    };

    match run(args, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "Check failed");
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
