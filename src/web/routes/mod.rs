//! Contains all the routes that this application can handle.

mod submission_created;
mod subscribe;

pub use submission_created::submission_created;
pub use subscribe::subscribe;

use crate::AppState;

use axum::{
    http::StatusCode,
    routing::{any, get},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server.
/// The gateway routes accept any method, they answer OPTIONS and 405 themselves.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/subscribe", any(subscribe))
        .with_state(app_state)
        .route("/submission-created", any(submission_created))
        .route("/health-check", get(health_check))
}
