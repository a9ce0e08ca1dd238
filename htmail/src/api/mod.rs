//! HTTP surface
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | [`handlers::root`] |
//! | `GET /health` | [`handlers::health`] |
//! | `GET /templates` | [`handlers::list_templates`] |
//! | `POST /send-email` | [`handlers::send_email`] |
//! | `POST /generate-email-html` | [`handlers::generate_email_html`] |
//! | `POST /upload-template` | [`handlers::upload_template`] |

pub mod handlers;
pub mod models;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

/// Build the application router
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use htmail::{api, config::HtmailConfig, email::ConsoleBackend, state::AppState};
///
/// let state = AppState::new(HtmailConfig::default(), Arc::new(ConsoleBackend::new()));
/// let app: axum::Router = api::router(state);
/// ```
pub fn router(state: AppState) -> Router {
    let upload_body_limit = state
        .config()
        .server
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let cors_permissive = state.config().server.cors_permissive;

    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/templates", get(handlers::list_templates))
        .route("/send-email", post(handlers::send_email))
        .route("/generate-email-html", post(handlers::generate_email_html))
        .route(
            "/upload-template",
            post(handlers::upload_template).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
