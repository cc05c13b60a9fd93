mod cli;

use crate::cli::{GeneratorArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use stellar_core::{Registry, Repository};
use stellar_gateway::{App, AppState};
use stellar_generator::{Generator, RandomGenerator, SeqGenerator};
use stellar_registry::{AllocatorSettings, UrlRegistry};
use stellar_storage::{InMemoryRepository, MySqlRepository, MySqlSettings};
use stellar_telemetry::TelemetryConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    stellar_telemetry::init(&TelemetryConfig::builder().format(config.log_format).build())?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        generator = %config.generator,
        "starting gateway server"
    );

    let generator: Box<dyn Generator> = match config.generator {
        GeneratorArg::Random => Box::new(RandomGenerator::new()),
        GeneratorArg::Sequential => Box::new(SeqGenerator::new()),
    };
    let settings = AllocatorSettings::builder()
        .length(config.id_length)
        .max_attempts_per_length(config.max_attempts_per_length)
        .max_length(config.max_id_length)
        .build();

    let registry: Arc<dyn Registry> = match config.storage {
        StorageBackendArg::InMemory => {
            build_registry(InMemoryRepository::new(), generator, settings)?
        }
        StorageBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let mysql_settings = MySqlSettings::builder()
                .max_connections(config.mysql_max_connections)
                .acquire_timeout(Duration::from_secs(config.mysql_acquire_timeout_secs))
                .build();
            let repository = MySqlRepository::connect_with(dsn, &mysql_settings)
                .await
                .context("failed to connect to mysql")?;
            if config.mysql_init_schema {
                repository
                    .init_schema()
                    .await
                    .context("failed to create mysql schema")?;
            }
            build_registry(repository, generator, settings)?
        }
    };

    let mut router = App::router(AppState::new(registry, config.base_url));
    if !config.cors_allowed_origins.is_empty() {
        router = router.layer(App::cors_layer(&config.cors_allowed_origins)?);
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway server is listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

fn build_registry<R: Repository>(
    repository: R,
    generator: Box<dyn Generator>,
    settings: AllocatorSettings,
) -> anyhow::Result<Arc<dyn Registry>> {
    let registry = UrlRegistry::new(repository, generator, settings)
        .context("invalid short id allocation settings")?;
    Ok(Arc::new(registry))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
