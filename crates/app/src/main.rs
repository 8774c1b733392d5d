//! SACCO session client binary.
//!
//! Logs in, issues authenticated requests against the API using the
//! persisted session, and keeps the refresh cookie between runs so an
//! expired access credential can be renewed.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sacco_application::config::{
    DEFAULT_API_BASE_URL, DEFAULT_LOGIN_PATH, DEFAULT_REFRESH_PATH, DEFAULT_REQUEST_TIMEOUT_MS,
};
use sacco_application::{SessionClient, SessionConfig};
use sacco_infrastructure::{
    FileKeyValueStore, ReqwestTransport, RouteNavigator, TokioFileSystem, log_in,
    restore_refresh_cookie, save_refresh_cookie,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_REQUEST_PATH: &str = "/members/";
const START_ROUTE: &str = "/";

#[derive(Parser, Debug)]
#[command(name = "sacco", version, about = "SACCO API client with transparent session refresh")]
struct Cli {
    /// API base URL that request paths are resolved against.
    #[arg(long, env = "SACCO_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Session file; defaults to the user data directory.
    #[arg(long, env = "SACCO_STORE_PATH")]
    store_path: Option<PathBuf>,

    #[arg(long, env = "SACCO_LOGIN_PATH", default_value = DEFAULT_LOGIN_PATH)]
    login_path: String,

    #[arg(long, env = "SACCO_REFRESH_PATH", default_value = DEFAULT_REFRESH_PATH)]
    refresh_path: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "SACCO_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Refresh cookie (`name=value`) to use instead of the stored one.
    #[arg(long, env = "SACCO_REFRESH_COOKIE")]
    refresh_cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Exchange credentials for a session.
    Login {
        username: String,
        #[arg(long, env = "SACCO_PASSWORD")]
        password: String,
    },
    /// Send an authenticated GET request and print the body.
    Get {
        #[arg(default_value = DEFAULT_REQUEST_PATH)]
        path: String,
    },
    /// Clear the stored session.
    Logout,
}

impl Cli {
    fn config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_api_base_url(self.api_url.clone())
            .with_login_path(self.login_path.clone())
            .with_refresh_path(self.refresh_path.clone())
            .with_request_timeout_ms(self.timeout_ms)
    }

    fn store_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        self.store_path
            .clone()
            .or_else(FileKeyValueStore::<TokioFileSystem>::default_path)
            .ok_or_else(|| "no data directory found; set SACCO_STORE_PATH".into())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let store_path = cli.store_path()?;

    tracing::info!(
        api = %config.api_base_url,
        store = %store_path.display(),
        "starting SACCO client v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = SessionClient::new(
        config.clone(),
        ReqwestTransport::new(&config)?,
        FileKeyValueStore::new(TokioFileSystem::new(), store_path),
        RouteNavigator::new(START_ROUTE),
    );
    restore_refresh_cookie(&client).await?;
    if let Some(cookie) = &cli.refresh_cookie {
        client.transport().restore_cookie_header(cookie);
    }

    match cli.command {
        Command::Login { username, password } => {
            let profile = log_in(&client, &username, &password).await?;
            let name = profile
                .as_ref()
                .and_then(|p| p.username())
                .unwrap_or(username.as_str());
            println!("logged in as {name}");
        }
        Command::Get { path } => {
            if !client.is_authenticated().await {
                tracing::warn!("no stored access token, the request will rely on a refresh");
            }
            let result = client.get(path).await;
            save_refresh_cookie(&client).await?;
            println!("{}", result?.text());
        }
        Command::Logout => {
            client.logout().await;
            save_refresh_cookie(&client).await?;
        }
    }

    Ok(())
}
