use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use staybook::config::AppConfig;
use staybook::db;
use staybook::routes::build_router;
use staybook::services::notify::webhook::WebhookNotifier;
use staybook::services::notify::{BookingNotifier, LogNotifier};
use staybook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if config.admin_token == "changeme" {
        tracing::warn!("ADMIN_TOKEN is unset, using the default token");
    }

    let conn = db::init_db(&config.database_url)?;

    let notifier: Box<dyn BookingNotifier> = match &config.notify_webhook_url {
        Some(url) => {
            tracing::info!(url = %url, signed = config.notify_webhook_secret.is_some(), "using webhook notifier");
            Box::new(WebhookNotifier::new(
                url.clone(),
                config.notify_webhook_secret.clone(),
            ))
        }
        None => {
            tracing::info!("NOTIFY_WEBHOOK_URL not set, booking events are only logged");
            Box::new(LogNotifier)
        }
    };

    let (events_tx, _) = broadcast::channel(256);

    tracing::info!(
        property = %config.property_name,
        timezone = %config.timezone.name(),
        "loaded configuration"
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        notifier,
        events_tx,
    });

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
