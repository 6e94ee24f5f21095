//! chioma-session - command line front end for the client session store.
//!
//! Every session command hydrates the stored session first, then runs inside
//! a `SessionProvider` scope. `configure` only edits the config file.

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chioma_session_core::config::StorageBackend;
use chioma_session_core::navigation::LogNavigator;
use chioma_session_core::{use_session, Config, SessionProvider, User};

#[derive(Debug, Parser)]
#[command(name = "chioma-session", about = "Manage the signed-in Chioma session")]
struct Cli {
    /// Override the backend base URL
    #[arg(long, value_name = "URL", global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Provide password non-interactively; otherwise prompt
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Print the current session as JSON
    Status,
    /// Store tokens obtained elsewhere, e.g. from registration
    SetTokens {
        #[arg(long, value_name = "TOKEN")]
        access: String,
        #[arg(long, value_name = "TOKEN")]
        refresh: Option<String>,
        /// User record as JSON
        #[arg(long, value_name = "JSON")]
        user: String,
    },
    /// Persist settings to the config file; `--api` sets the backend URL
    Configure {
        /// Where the session is kept: file or keyring
        #[arg(long, value_name = "BACKEND")]
        storage: Option<StorageBackend>,
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Route shown after logout
        #[arg(long, value_name = "ROUTE")]
        login_route: Option<String>,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    let _guard = init_tracing();

    let cli = Cli::parse();

    let command = match cli.command {
        Command::Configure {
            storage,
            timeout,
            login_route,
        } => return configure(cli.api, storage, timeout, login_route),
        command => command,
    };

    let mut config = Config::load()?.with_env()?;
    if let Some(api) = cli.api.clone() {
        config.api_base_url = api;
    }
    debug!(api = %config.api_base_url, "Config loaded");

    let navigator = Arc::new(LogNavigator::new());
    let store = Arc::new(config.build_store(navigator.clone())?);
    let hydration = store.hydrate().context("Failed to restore stored session")?;
    debug!(?hydration, "Session hydrated");

    SessionProvider::scope(store, run(command)).await?;

    if let Some(route) = navigator.last_route() {
        println!("Redirect: {}", route);
    }
    Ok(())
}

/// Update the stored config file. Environment overrides are not applied so
/// they never get written back.
fn configure(
    api: Option<String>,
    storage: Option<StorageBackend>,
    timeout: Option<u64>,
    login_route: Option<String>,
) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(api) = api {
        config.api_base_url = api;
    }
    if let Some(storage) = storage {
        config.storage = storage;
    }
    if let Some(timeout) = timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(route) = login_route {
        config.login_route = route;
    }
    let path = config.save().context("Failed to save config")?;
    info!(path = %path.display(), "Config updated");
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn run(command: Command) -> Result<()> {
    let session = use_session()?;

    match command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Password: ")?,
            };
            let result = session.login(&email, &password).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.success {
                info!("Login successful");
            }
        }
        Command::Logout => {
            session.logout().await?;
            println!("Logged out");
        }
        Command::Status => {
            println!("{}", serde_json::to_string_pretty(&session.state().view())?);
        }
        Command::SetTokens {
            access,
            refresh,
            user,
        } => {
            let user: User = serde_json::from_str(&user).context("Invalid user JSON")?;
            session.set_tokens(&access, refresh.as_deref(), &user)?;
            println!("Session stored for {}", user.full_name());
        }
        Command::Configure { .. } => bail!("configure does not run inside a session"),
    }
    Ok(())
}
