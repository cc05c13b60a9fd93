use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{create_url_handler, health_handler, redirect_handler, stats_handler};
use crate::state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/api",
                Router::new()
                    .route("/shorten", post(create_url_handler))
                    .route("/stats/{short_id}", get(stats_handler))
                    .route("/{short_id}", get(redirect_handler)),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Cross-origin policy for browser clients on `origins`.
    ///
    /// Credentials are allowed, so origins are listed explicitly and request
    /// headers are mirrored instead of using a wildcard.
    pub fn cors_layer<S: AsRef<str>>(origins: &[S]) -> anyhow::Result<CorsLayer> {
        let origins = origins
            .iter()
            .map(|origin| HeaderValue::from_str(origin.as_ref().trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
            .max_age(CORS_MAX_AGE))
    }
}
