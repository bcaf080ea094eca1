//! jukebox - a small self-hosted song request queue
//!
//! Users log in, queue one song request at a time, and an administrator
//! manages the accounts.

mod api;
mod config;
mod core;
mod db;
mod error;
mod models;
mod state;
mod utils;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, Paths};
use crate::core::{CredentialStore, Fetcher, YtDlpFetcher};
use crate::state::AppState;

/// jukebox - song request queue
#[derive(Parser, Debug)]
#[command(name = "jukebox")]
#[command(version)]
#[command(about = "A small self-hosted song request queue")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reset password for a user
    #[arg(long)]
    password_reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(format!(
        "{},sqlx=warn,actix_server=warn",
        log_level
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("jukebox v{} starting...", env!("CARGO_PKG_VERSION"));

    let paths = Paths::init(args.config)?;
    info!("Config directory: {:?}", paths.config_dir());

    let config = AppConfig::load(&paths.settings_path())?;
    let db = db::setup_sqlite(&paths.app_db_path()).await?;

    if args.password_reset {
        return utils::tools::password_reset(&CredentialStore::new(db)).await;
    }

    utils::tools::bootstrap_admin(&CredentialStore::new(db.clone()), &config).await?;

    let fetcher: Option<Arc<dyn Fetcher>> = if config.fetch_on_submit {
        info!(
            "Downloading accepted requests with {} into {:?}",
            config.fetcher_executable,
            paths.downloads_dir()
        );
        Some(Arc::new(YtDlpFetcher::from_config(&config)))
    } else {
        None
    };

    let state = web::Data::new(AppState::new(db, config, paths, fetcher));

    let addr = format!("{}:{}", args.host, args.port);
    info!("Server listening on http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
