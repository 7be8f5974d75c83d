//! Route table

use super::handlers::{
    AppState, create_cinema, health_check, search_body, search_query, update_cinema,
};
use axum::{Router, routing::get, routing::post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the cinema routes
///
/// - GET /cines - Search (query string)
/// - POST /cines/search - Search (JSON body)
/// - POST /cines - Create
/// - PUT /cines, PATCH /cines - Update
pub fn build_cinema_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/cines",
            get(search_query)
                .post(create_cinema)
                .put(update_cinema)
                .patch(update_cinema),
        )
        .route("/cines/search", post(search_body))
        .with_state(state)
}

/// Health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// The full application router, with CORS and HTTP tracing
pub fn build_router(state: AppState, custom_routes: Vec<Router>) -> Router {
    let mut app = health_routes().merge(build_cinema_routes(state));
    for custom_router in custom_routes {
        app = app.merge(custom_router);
    }
    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
