//! Icinga Status Proxy Binary

use std::path::PathBuf;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use icinga_status_proxy::{AppState, Config, SchemaOptions, StartupError, controllers};

#[derive(Debug, Parser)]
#[command(version, about = "Serve Icinga IDO host and service status as JSON")]
struct Cli {
    /// JSON file with DB_NAME, DB_USER and DB_PASS
    #[arg(long, env = "APP_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides BIND_ADDRESS
    #[arg(long)]
    bind: Option<String>,

    /// Listen port, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    initialize_tracing();

    info!("Starting Icinga status proxy v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(StartupError::Config(e));
    }

    info!(
        "Proxy configuration - Listen: [{}]:{}, Database: {}@{}:{}/{}, Acknowledgements: {}",
        config.bind_address,
        config.port,
        config.db_user,
        config.db_host,
        config.db_port,
        config.db_name,
        config.track_acknowledgements
    );

    // Lazy so the proxy starts (and answers /health) while the database is down
    let pool: PgPool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(config.connect_options());

    let state = web::Data::new(AppState::new(
        pool,
        SchemaOptions {
            track_acknowledgements: config.track_acknowledgements,
        },
    ));

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(controllers::configure::<PgPool>)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    info!("Icinga status proxy stopped");
    Ok(())
}

/// Initialize structured logging
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let text_format = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("text"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter_layer);
    if text_format {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init();
    }
}
