use crate::core::StatService;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<StatService>,
    pub loaded_at: DateTime<Utc>,
    pub openapi: Arc<serde_json::Value>,
}

impl AppState {
    pub fn new(service: StatService) -> Self {
        Self {
            service: Arc::new(service),
            loaded_at: Utc::now(),
            openapi: Arc::new(super::docs::openapi_document()),
        }
    }
}
