pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::counseling::handlers as counseling;
use crate::i18n::handlers as i18n;
use crate::scholarships::handlers as scholarships;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let site = ServeDir::new(&state.config.site_root);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(counseling::handle_analyze))
        .route("/api/chat", post(counseling::handle_chat))
        .route("/api/scholarships", get(scholarships::handle_list_scholarships))
        .route("/api/i18n/:lang", get(i18n::handle_get_locale))
        .layer(DefaultBodyLimit::max(body_limit))
        // Everything else is the static site (HTML/CSS/JS/dictionaries).
        .fallback_service(site)
        .with_state(state)
}
