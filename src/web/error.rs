use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::types::{Envelope, RequestError};
use crate::provider_client::SubmissionFailure;

pub type WebResult<T> = core::result::Result<T, Error>;

pub const MISSING_API_KEY_MSG: &str = "Server configuration error: Missing API key";
pub const PROVIDER_UNAVAILABLE_MSG: &str = "Error communicating with ConvertKit API";

/// Every way a gateway request can end without a subscription.
/// Each variant maps to exactly one status code and envelope, see `into_response`.
#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("invalid client input: {0}")]
    Request(#[from] RequestError),
    #[error("provider api key is not configured")]
    MissingApiKey,
    #[error("provider rejected the subscription with status {http_status}: {reason}")]
    ProviderRejection {
        http_status: StatusCode,
        reason: String,
        details: Value,
    },
    #[error("provider unavailable, form endpoint: {form_error}; subscribers endpoint: {alt_error}")]
    ProviderUnavailable {
        form_error: String,
        alt_error: String,
    },
}

impl From<SubmissionFailure> for Error {
    fn from(failure: SubmissionFailure) -> Self {
        match failure {
            SubmissionFailure::Rejected {
                http_status,
                reason,
                details,
            } => Error::ProviderRejection {
                http_status,
                reason,
                details,
            },
            SubmissionFailure::Unavailable {
                form_error,
                alt_error,
            } => Error::ProviderUnavailable {
                form_error,
                alt_error,
            },
        }
    }
}

impl Error {
    /// A structured provider rejection is reported as 400 whatever status the provider used.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::Request(_) | Error::ProviderRejection { .. } => StatusCode::BAD_REQUEST,
            Error::MissingApiKey | Error::ProviderUnavailable { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `None` for errors that answer with a plain text body.
    pub fn envelope(&self) -> Option<Envelope> {
        let envelope = match self {
            Error::MethodNotAllowed => return None,
            Error::Request(req_er) => Envelope::failure(req_er.to_string()),
            Error::MissingApiKey => Envelope::failure(MISSING_API_KEY_MSG),
            Error::ProviderRejection {
                reason, details, ..
            } => Envelope::failure(reason.as_str()).with_details(details.clone()),
            Error::ProviderUnavailable {
                form_error,
                alt_error,
            } => Envelope::failure(PROVIDER_UNAVAILABLE_MSG)
                .with_attempt_errors(form_error.clone(), alt_error.clone()),
        };
        Some(envelope)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        let status = self.status_code();
        let mut res = match self.envelope() {
            Some(envelope) => (status, Json(envelope)).into_response(),
            None => (status, "Method Not Allowed").into_response(),
        };

        // Insert the Error into response so that it can be logged later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}
