pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::state::AppState;
use crate::workbench::handlers;

/// Uploads are forwarded inline to the analysis service, which caps a request near 20 MB.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", get(handlers::handle_list_jobs))
        .route("/api/v1/workbench", get(handlers::handle_get_workbench))
        .route("/api/v1/workbench/job", put(handlers::handle_set_job))
        .route("/api/v1/workbench/mode", put(handlers::handle_set_mode))
        .route(
            "/api/v1/workbench/candidates",
            post(handlers::handle_add_candidate),
        )
        .route(
            "/api/v1/workbench/candidates/:id",
            patch(handlers::handle_update_candidate).delete(handlers::handle_remove_candidate),
        )
        .route("/api/v1/workbench/drag", post(handlers::handle_drag))
        .route(
            "/api/v1/workbench/files",
            post(handlers::handle_upload_files).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/workbench/files/:id",
            delete(handlers::handle_remove_file),
        )
        .route("/api/v1/workbench/analyze", post(handlers::handle_analyze))
        .with_state(state)
}
