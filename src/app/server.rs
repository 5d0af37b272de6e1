use crate::config::TomlConfig;
use crate::core::{CoefficientStore, StatService};
use crate::http::{create_router, AppState};
use crate::utils::error::{Result, StatsError};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct StartupSummary {
    pub modules: usize,
    pub groups: BTreeMap<String, usize>,
    pub files: Vec<String>,
}

/// Loads every configured data file and builds the stat service.
/// Any error here is fatal: the server never starts with partial data.
pub fn load_service(config: &TomlConfig) -> Result<(StatService, StartupSummary)> {
    let source = config.module_source();
    tracing::info!("📁 Loading module data from {} file(s)", source.files().len());

    let store = CoefficientStore::load(&source)?;
    let summary = StartupSummary {
        modules: store.len(),
        groups: store
            .group_counts()
            .into_iter()
            .map(|(group, count)| (group.to_string(), count))
            .collect(),
        files: source.files().to_vec(),
    };

    for (group, count) in &summary.groups {
        tracing::debug!("  group '{}': {} modules", group, count);
    }
    tracing::info!("✅ Loaded {} modules", summary.modules);

    Ok((StatService::new(Arc::new(store), config.quality), summary))
}

pub async fn serve(config: TomlConfig) -> Result<()> {
    let (service, _) = load_service(&config)?;
    let app = create_router(AppState::new(service), config.server.cors);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| StatsError::ServerError {
            message: format!("failed to bind {}: {}", address, e),
        })?;
    tracing::info!(address = %address, "🚀 server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("🛑 Shutdown signal received");
        })
        .await
        .map_err(|e| StatsError::ServerError {
            message: e.to_string(),
        })
}
