//! Most of the structs in `web` module and their implementations live here.
//! Includes the inbound request that needs to be validated and the JSON envelope every
//! gateway response body is built from.

use axum::extract::rejection::BytesRejection;
use serde::Serialize;
use serde_json::Value;

// ###################################
// ->   STRUCTS
// ###################################
/// A validated subscription request.
/// The email is only checked for presence, the provider validates the format itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    email: String,
}

/// The JSON body of every gateway response.
/// Constructors guarantee that exactly one of `message` or `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(rename = "formError", skip_serializing_if = "Option::is_none")]
    form_error: Option<String>,
    #[serde(rename = "altError", skip_serializing_if = "Option::is_none")]
    alt_error: Option<String>,
    // Outer `None` omits the field, `Some(None)` renders `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    subscriber: Option<Option<String>>,
}

// ###################################
// ->   IMPLS
// ###################################
impl SubscriptionRequest {
    /// An empty body counts as a request without an email, anything else has to be JSON.
    /// `email` has to be a string: `null` counts as missing, any other type is an invalid body.
    pub fn parse(body: &[u8]) -> Result<Self, RequestError> {
        if body.is_empty() {
            return Err(RequestError::MissingEmail);
        }

        let value: Value = serde_json::from_slice(body).map_err(|_| RequestError::InvalidBody)?;

        match value.get("email") {
            Some(Value::String(email)) if !email.is_empty() => Ok(SubscriptionRequest {
                email: email.clone(),
            }),
            None | Some(Value::Null) | Some(Value::String(_)) => Err(RequestError::MissingEmail),
            Some(_) => Err(RequestError::InvalidBody),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Envelope {
    pub fn subscribed(message: impl Into<String>, subscriber: Option<String>) -> Self {
        Envelope {
            success: true,
            message: Some(message.into()),
            error: None,
            details: None,
            form_error: None,
            alt_error: None,
            subscriber: Some(subscriber),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Envelope {
            success: false,
            message: None,
            error: Some(error.into()),
            details: None,
            form_error: None,
            alt_error: None,
            subscriber: None,
        }
    }

    /// Attaches the provider's own response body.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attaches what went wrong on each endpoint when both were tried.
    pub fn with_attempt_errors(mut self, form_error: String, alt_error: String) -> Self {
        self.form_error = Some(form_error);
        self.alt_error = Some(alt_error);
        self
    }
}

// ###################################
// ->   ERROR
// ###################################
/// Display strings are sent to the client as they are.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Email is required")]
    MissingEmail,
}

/// The body could not be read, most likely because it is over the size limit.
impl From<BytesRejection> for RequestError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::warn!(%rejection, "failed to read the request body");
        RequestError::InvalidBody
    }
}
