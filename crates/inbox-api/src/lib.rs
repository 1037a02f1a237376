pub mod contacts;
pub mod error;
pub mod form;
pub mod validation;

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get, post},
};

use inbox_db::Database;

use crate::validation::ContactRules;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub rules: ContactRules,
}

/// All routes of the service. Cross-cutting layers (CORS, tracing) are added
/// by the binary.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/contact", post(contacts::submit_contact))
        .route("/contacts", get(contacts::list_contacts))
        .route("/stats", get(contacts::get_stats))
        .route("/health", get(contacts::health))
        .fallback(contacts::api_not_found)
        .method_not_allowed_fallback(contacts::api_not_found);

    Router::new()
        .nest("/api", api)
        // The nest tail needs at least one segment, so the bare prefix is routed here.
        .route("/api/", any(contacts::api_not_found))
        .route("/good-bye.html", post(form::submit_form))
        .with_state(state)
}
