//! Matchday - Seasonal League Competition Backend
//!
//! Runs the league lifecycle engine behind an HTTP API: payment-gated
//! enrollment, fixture generation, and on-demand standings.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchday_backend::{
    api::{create_router, AppState},
    auth::JwtHandler,
    config::Config,
    db::Database,
    enrollment::HttpPaymentGateway,
    middleware::request_logging,
};

#[derive(Parser, Debug)]
#[command(name = "matchday", about = "League competition backend")]
struct Args {
    /// Bind port (overrides MATCHDAY_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides MATCHDAY_DB_PATH)
    #[arg(long)]
    db_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchday_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(db_path) = args.db_path {
        config.database_path = db_path;
    }

    info!("Starting matchday backend on port {}", config.port);

    let db = Arc::new(Database::new(&config.database_path)?);
    let gateway = Arc::new(HttpPaymentGateway::new(
        config.payment_api_base.clone(),
        config.payment_api_key.clone(),
        config.payment_timeout,
    )?);
    let jwt = Arc::new(JwtHandler::new(config.jwt_secret.clone()));

    let state = AppState {
        db,
        gateway,
        jwt,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state)
        .layer(axum::middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("HTTP server exited")?;

    Ok(())
}
