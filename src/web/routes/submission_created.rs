use axum::{body::Bytes, extract::rejection::BytesRejection, http::Method, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::web::{types::RequestError, Error, WebResult};

/// Body of the form submission notification.
#[derive(Deserialize, Debug)]
struct SubmissionNotification {
    payload: Value,
}

/// `/submission-created`
/// Acknowledges a form submission notification. Only logs the payload.
#[tracing::instrument(name = "Receiving form submission", skip(body))]
pub async fn submission_created(
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> WebResult<Json<Value>> {
    if method != Method::POST {
        return Err(Error::MethodNotAllowed);
    }

    let body = body.map_err(RequestError::from)?;
    let notification: SubmissionNotification =
        serde_json::from_slice(&body).map_err(|_| RequestError::InvalidBody)?;

    info!(payload = %notification.payload, "Form submission received");

    Ok(Json(json!({ "message": "Form submission received" })))
}
