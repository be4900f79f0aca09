use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redmine_relay::config::RelayConfig;
use redmine_relay::delivery::HttpDeliverer;
use redmine_relay::dispatch::Dispatcher;
use redmine_relay::hooks::HookListener;
use redmine_relay::payload::EventPayloadBuilder;
use redmine_relay::server::{build_router, AppState};
use redmine_relay::status::{CachedStatusDirectory, StaticStatusSource};
use redmine_relay::targets::{InMemoryTargetStore, TargetResolver};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redmine_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match RelayConfig::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        targets = config.targets.len(),
        statuses = config.statuses.len(),
        "configuration loaded"
    );

    let listener = HookListener::new(Dispatcher::new(
        TargetResolver::new(InMemoryTargetStore::new(config.targets.clone())),
        EventPayloadBuilder::new(CachedStatusDirectory::new(StaticStatusSource::new(
            config.status_map(),
        ))),
        HttpDeliverer::new(),
    ));
    let app = build_router(AppState::new(listener));

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(bind_addr = %config.bind_addr, error = %e, "invalid bind address");
            std::process::exit(1);
        }
    };
    tracing::info!("listening on {}", addr);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_token.cancel();
        }
    });

    let tcp = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(tcp, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .unwrap();
}
