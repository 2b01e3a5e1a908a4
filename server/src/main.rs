use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eventreg_server::config::{Config, MailTransportKind, StoreBackend};
use eventreg_server::delivery::{
    DeliveryDispatcher, DeliveryQueue, DeliveryTransport, DeliveryWorker, LogTransport,
    SmtpTransport,
};
use eventreg_server::routes::create_routes;
use eventreg_server::state::AppState;
use eventreg_server::store::{MemoryStore, PgStore, SharedStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    let store: SharedStore = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(&config.database_url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Successfully connected to database");

            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            tracing::info!("Migrations run successfully");

            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let transport: Arc<dyn DeliveryTransport> = match config.mail_transport {
        MailTransportKind::Smtp => Arc::new(
            SmtpTransport::new(&config.smtp).expect("Failed to configure SMTP transport"),
        ),
        MailTransportKind::Log => {
            tracing::warn!("MAIL_TRANSPORT=log, tickets are logged instead of emailed");
            Arc::new(LogTransport)
        }
    };

    let (deliveries, receiver) = DeliveryQueue::bounded(config.delivery_queue_capacity);
    let worker = DeliveryWorker::new(receiver, DeliveryDispatcher::new(transport)).spawn();

    let app: Router = create_routes(AppState::new(store, deliveries));

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    // The router owned the last queue handle, so the worker finishes what is
    // already queued and exits.
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Delivery worker terminated abnormally");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
