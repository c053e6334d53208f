//! HTTP layer: routing, request handlers and page rendering.

mod error;
pub mod flash;
mod handlers;
pub mod pages;
pub mod routes;
mod state;


use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::ApiError;
pub use state::AppState;

use crate::db::Database;
use crate::paths::get_db_path;

/// Secret used to sign flash cookies when none is configured.
pub const DEFAULT_SECRET_KEY: &str = "development key";

/// Server configuration.
///
/// Precedence: CLI flag (via the `with_*` builders) > environment variable > default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SQLite database file
    pub db_path: PathBuf,
    /// Secret the flash cookie signing key is derived from
    pub secret_key: String,
    /// Verbose logging
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            db_path: get_db_path(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Defaults overridden by `MICROBLOG_DATABASE`, `MICROBLOG_SECRET_KEY`
    /// and `MICROBLOG_DEBUG`. Empty variables are ignored.
    pub fn new() -> Self {
        let mut config = Self::default();

        if let Some(path) = non_empty_var("MICROBLOG_DATABASE") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(secret) = non_empty_var("MICROBLOG_SECRET_KEY") {
            config.secret_key = secret;
        }
        if let Some(flag) = non_empty_var("MICROBLOG_DEBUG") {
            config.debug = parse_flag(&flag);
        }

        config
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_db_path(mut self, db_path: PathBuf) -> Self {
        self.db_path = db_path;
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Initialize tracing subscriber with env filter.
///
/// `RUST_LOG` takes precedence over the debug flag.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "microblog=debug,tower_http=debug"
    } else {
        "microblog=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the server with the given configuration and database.
pub async fn run<D: Database + 'static>(config: Config, db: D) -> Result<(), ApiError> {
    let state = AppState::new(db, flash::signing_key(&config.secret_key));
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("microblog listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
