use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use mongodb::Client;
use tracing_subscriber::EnvFilter;

use ruststocks::{config, repositories::MongoOrdersRepository, routes, templates, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::load();
    settings.validate().context("invalid configuration")?;

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .context("failed to connect to MongoDB")?;
    let db = client.database(&settings.mongodb_db);

    let orders = MongoOrdersRepository::new(db);
    if let Err(e) = orders.ensure_indexes().await {
        tracing::warn!(error = %e, "could not create order indexes");
    }

    let hbs = templates::build_handlebars().context("failed to load templates")?;
    let state = AppState::new(settings.clone(), hbs, Arc::new(orders));

    let app = routes::app(state);

    let ip = settings
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("invalid HOST {}", settings.host))?;
    let addr = SocketAddr::from((ip, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
