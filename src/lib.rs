use std::{net::SocketAddr, sync::Arc};

use database::AppDatabase;
use dotenvy::dotenv;
use jobs::spawn_all_jobs;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod app;
pub mod constants;
pub mod database;
pub mod handlers;
pub mod import;
pub mod jobs;
pub mod jwt;
pub mod models;
pub mod otp;
pub mod state;
pub mod stores;
pub mod swagger;
pub mod utils;

pub async fn start_web_server() {
    // import .env file
    dotenv().ok();
    initialize_logging();
    // create database client
    let db_client = match AppDatabase::new().await {
        Ok(db_client) => Arc::new(db_client),
        Err(err) => {
            tracing::error!("Unable to acquire database client: {:?}", err);
            return;
        }
    };
    let state = AppState::from_env(db_client).await;
    let jobs = spawn_all_jobs(state.otp.clone());
    start_server(state).await;
    jobs.stop().await;
    tracing::debug!("Background jobs stopped");
}

fn initialize_logging() {
    // create default env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or("appleverse_backend=debug,tower_http=debug".into());

    // initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

async fn start_server(state: AppState) {
    // read the port number from env variable
    let port = std::env::var("PORT").unwrap_or_default();
    let port = port.parse::<u16>().unwrap_or(3000);
    // build the socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    // create the app instance
    let app = app::build_app(state);
    tracing::debug!("Starting the app in: {addr}");
    // start serving the app in the socket address
    let server = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal());
    if let Err(err) = server.await {
        tracing::error!("Server error: {:?}", err);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Unable to listen for shutdown signal: {:?}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}
