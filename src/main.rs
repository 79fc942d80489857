//! materials-search server entry point

use anyhow::Result;
use materials_search::{
    config::Settings,
    network::HttpClient,
    providers::ProviderLoader,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().skip(1).any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    // Load configuration before logging so `general.debug` can set the level
    let settings = load_settings()?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting materials-search v{}", materials_search::VERSION);
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Load providers and cities
    let (registry, cities) = ProviderLoader::load(&settings, &client)?;

    // Create application state
    let state = AppState::new(settings.clone(), registry, cities);
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load settings from the first file found, or use defaults
fn load_settings() -> Result<Settings> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var("MATSEARCH_SETTINGS_PATH") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("settings.yml"));
    candidates.push(PathBuf::from("config/settings.yml"));
    candidates.push(PathBuf::from("/etc/materials-search/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("materials-search/settings.yml"));
    }

    let mut settings = match candidates.iter().find(|p| p.exists()) {
        Some(path) => {
            eprintln!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => Settings::default(),
    };
    settings.merge_env();
    Ok(settings)
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
materials-search v{}
Concurrent product search across construction-material stores

USAGE:
    materials-search [OPTIONS]

OPTIONS:
    -h, --help             Print help information

ENVIRONMENT VARIABLES:
    MATSEARCH_SETTINGS_PATH  Path to settings.yml
    MATSEARCH_DEBUG          Enable debug logging (true/false)
    MATSEARCH_PORT           Server port
    MATSEARCH_BIND_ADDRESS   Bind address
    RUST_LOG                 Log filter, overrides MATSEARCH_DEBUG
"#,
        materials_search::VERSION
    );
}
