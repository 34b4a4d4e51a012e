use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use gate_store::app_config::CorsConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod boarding;
pub mod checkin;
pub mod error;
pub mod flights;
pub mod state;
pub mod websocket;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.cors);

    let api = Router::new()
        .merge(flights::routes())
        .merge(checkin::routes())
        .merge(boarding::routes())
        .route("/ws", get(websocket::boarding_socket));

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if config.allows_any() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
