use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use covid_dash_api::{router, AppState};
use covid_dash_core::ingest::HttpSeriesClient;
use covid_dash_core::query::SeriesQuery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = covid_dash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let query = SeriesQuery::from_settings(&settings);
    let client = HttpSeriesClient::from_settings(&settings)?;
    let state = AppState::new(Arc::new(client), query);

    let app = router(state);

    let port: u16 = match std::env::var("PORT") {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("PORT must be a port number (got {v:?})"))?,
        Err(_) => 3000,
    };
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, dataset = %settings.cdc_dataset_id, "api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &covid_dash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
