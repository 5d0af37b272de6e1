use super::error::ApiQuery;
use super::state::AppState;
use crate::domain::model::{
    HealthResponse, ListQuery, ModuleListItem, ModuleStatsQuery, ModuleStatsResponse, StatQuery,
    StatResult, StatusResponse,
};
use crate::utils::error::Result;
use axum::extract::State;
use axum::response::Html;
use axum::Json;

pub async fn root_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        modules: state.service.store().len(),
        loaded_at: state.loaded_at.to_rfc3339(),
    })
}

pub async fn list_modules_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Json<Vec<ModuleListItem>> {
    Json(state.service.list_modules(query.lang))
}

pub async fn stat_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatQuery>,
) -> Result<Json<StatResult>> {
    state.service.evaluate(&query).map(Json)
}

pub async fn module_stats_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ModuleStatsQuery>,
) -> Result<Json<ModuleStatsResponse>> {
    state
        .service
        .module_stats(&query.module, query.q, query.lang)
        .map(Json)
}

pub async fn openapi_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.openapi.as_ref().clone())
}

pub async fn docs_handler() -> Html<&'static str> {
    Html(super::docs::SWAGGER_UI_HTML)
}
