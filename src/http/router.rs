use super::handlers::{
    docs_handler, health_handler, list_modules_handler, module_stats_handler, openapi_handler,
    root_handler, stat_handler,
};
use super::state::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/modules", get(list_modules_handler))
        .route("/stat", get(stat_handler))
        .route("/module-stats", get(module_stats_handler))
        .route("/openapi.json", get(openapi_handler))
        .route("/docs", get(docs_handler))
        .with_state(state);

    let router = if cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}
