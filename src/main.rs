mod builder;
mod config;
mod handlers;
mod jsonurl;
mod models;
mod query;
mod reference;
mod render;
mod router;
mod services;
mod ws;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use builder::BuilderStore;
use config::Config;
use reference::ReferenceData;
use render::RenderClient;
use ws::Hub;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub reference: Arc<ReferenceData>,
    pub builders: BuilderStore,
    pub renderer: RenderClient,
    pub ws_hub: Arc<Hub>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rackdiagram_config=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting rackdiagram-config");
    tracing::info!("Render API: {}", cfg.api_endpoint);
    if cfg.staging_api_endpoint.is_empty() {
        tracing::info!("Staging endpoint not configured");
    }
    tracing::info!("Listen: {}", cfg.listen_addr);

    let reference = ReferenceData::load(&cfg.reference_data_path)?;
    tracing::info!(
        "Reference data loaded ({} chassis sizes, {} shelf sizes, {} csizes)",
        reference.chassis_dp_size_lookup.len(),
        reference.shelf_dp_size_lookup.len(),
        reference.csize_lookup.len()
    );

    let renderer = RenderClient::new(cfg.render_timeout_secs)?;
    let builders = BuilderStore::new();

    // Sweep idle builder sessions
    {
        let builders = builders.clone();
        let ttl = cfg.builder_session_ttl_secs;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                let removed = builders.sweep_idle(ttl).await;
                if removed > 0 {
                    tracing::info!(
                        "Removed {} idle builder sessions ({} active)",
                        removed,
                        builders.len().await
                    );
                }
            }
        });
    }

    let state = Arc::new(AppState {
        config: cfg.clone(),
        reference: Arc::new(reference),
        builders,
        renderer,
        ws_hub: Arc::new(Hub::new()),
    });

    let app = router::build(state, &cfg.frontend_dir);

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("rackdiagram-config listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("rackdiagram-config shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
