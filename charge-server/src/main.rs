use std::error::Error;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use charge_server::config::Config;
use charge_server::directory::{DirectoryConfig, OpenChargeMapClient};
use charge_server::geocode::{CachedGeocoder, GeocodeCacheConfig, GeocoderConfig, GoogleGeocoder};
use charge_server::places::{GooglePlacesClient, PlacesConfig};
use charge_server::store::{MemoryStore, PgStore, Store};
use charge_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("charge_server=info,tower_http=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let timeout = config.upstream_timeout_secs;

    let directory = OpenChargeMapClient::new(
        DirectoryConfig::new(&config.directory_api_key).with_timeout(timeout),
    )?;
    let places =
        GooglePlacesClient::new(PlacesConfig::new(&config.places_api_key).with_timeout(timeout))?;
    let geocoder = CachedGeocoder::new(
        GoogleGeocoder::new(GeocoderConfig::new(&config.places_api_key).with_timeout(timeout))?,
        &GeocodeCacheConfig::default(),
    );

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            info!("connecting to document store");
            Arc::new(PgStore::connect(url, config.database_max_connections).await?)
        }
        None => Arc::new(MemoryStore::new()),
    };

    let state = AppState::new(
        Arc::new(geocoder),
        Arc::new(directory),
        Arc::new(places),
        store.clone(),
        config.search.clone(),
    );
    let app = create_router(state, &config.cors_whitelist);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    info!("  POST   /station/stations        - Search stations");
    info!("  GET    /station/id/:stationId   - Station detail with nearby places");
    info!("  POST   /station/add-favorite    - Add a favorite");
    info!("  DELETE /station/remove-favorite - Remove a favorite");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
