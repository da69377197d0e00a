//! Prediction Serving - server entry point

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prediction_serving::{
    config::Config,
    create_router,
    model::{FileModelLoader, ModelRegistry},
    sink::{MetricsPublisher, SinkDispatcher},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_tracing(&config);

    tracing::info!("Prediction Serving v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.environment);
    if config.is_production() && config.debug {
        tracing::warn!("DEBUG is enabled in production");
    }

    let model = ModelRegistry::load_initial(FileModelLoader::new(config.model_path.clone()));
    tracing::info!("Model loaded: {}", model.is_loaded());
    if !model.is_loaded() {
        tracing::error!("Model failed to load! Prediction routes will answer 503 until /model/reload succeeds.");
    }

    let sinks = SinkDispatcher::from_config(&config);
    tracing::info!("Prediction sinks: {}", sinks.len());
    let publisher = MetricsPublisher::from_config(&config);
    if publisher.is_empty() {
        tracing::info!("Metrics export disabled");
    }

    let addr = config.bind_addr();
    let state = AppState::new(config, model, sinks, publisher);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shutting down application");
    Ok(())
}

fn init_tracing(config: &Config) {
    let default_filter = if config.debug {
        "prediction_serving=debug,predictions=info,metrics=info,tower_http=debug"
    } else {
        "prediction_serving=info,predictions=info,metrics=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
