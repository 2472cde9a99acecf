pub mod api;

use axum::http::Request;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

use crate::application::state::AppState;

/// 10 MB request body limit, sized for camera uploads.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn app_router(state: AppState) -> axum::Router {
    // The booth frontend is served from another origin, so the API stays open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    axum::Router::new()
        .nest("/api", api::router())
        .nest_service("/generated", ServeDir::new(state.generated_dir.clone()))
        .nest_service("/assets", ServeDir::new(state.assets_dir.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(BrandboothMakeSpan)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
                .layer(cors),
        )
        .with_state(state)
}

#[derive(Clone)]
struct BrandboothMakeSpan;

impl<B> MakeSpan<B> for BrandboothMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
        )
    }
}
