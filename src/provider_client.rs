//! HTTP client for the mailing-list provider.
//!
//! A subscription is submitted to the form scoped endpoint first. Only when that
//! endpoint is unusable (transport failure or a body that is not JSON) is the
//! direct subscriber endpoint tried, once. A JSON error from the form endpoint is
//! a deliberate rejection and is never retried.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use strum_macros::AsRefStr;
use tracing::{debug, info, warn};

use crate::utils;

/// Reason reported when a rejection body carries no usable `error` field.
pub const DEFAULT_REJECTION_REASON: &str = "Error from ConvertKit API";

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Endpoint {
    #[strum(serialize = "form")]
    Form,
    #[strum(serialize = "subscribers")]
    Subscribers,
}

/// The result of a single call to one provider endpoint.
#[derive(Debug)]
pub enum Attempt {
    /// 2xx with a JSON body.
    Accepted { subscriber_id: Option<String> },
    /// Non 2xx with a JSON body.
    Rejected { status: StatusCode, body: Value },
    /// No response, or a response whose body is not JSON.
    Unavailable { reason: String },
}

/// Final result of the two step submission.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Success {
        subscriber_id: Option<String>,
        endpoint: Endpoint,
    },
    Failure(SubmissionFailure),
}

#[derive(Debug)]
pub enum SubmissionFailure {
    /// The form endpoint understood and refused the request.
    Rejected {
        http_status: StatusCode,
        reason: String,
        details: Value,
    },
    /// Neither endpoint produced a usable answer.
    Unavailable {
        form_error: String,
        alt_error: String,
    },
}

#[derive(Debug, Clone)]
pub struct ProviderClient {
    http_client: Client,
    form_url: Url,
    subscribers_url: Url,
}

impl ProviderClient {
    pub fn new<S: AsRef<str>>(
        base_url: S,
        form_id: u64,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;
        // `Url::join` replaces the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let form_url = base_url
            .join(&format!("forms/{form_id}/subscribe"))
            .map_err(|e| Error::UrlParsing(e.to_string()))?;
        let subscribers_url = base_url
            .join("subscribers")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(ProviderClient {
            http_client,
            form_url,
            subscribers_url,
        })
    }

    pub fn url(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::Form => &self.form_url,
            Endpoint::Subscribers => &self.subscribers_url,
        }
    }

    /// Runs the primary call and, when it is unusable, the fallback call.
    /// The calls are strictly sequential.
    #[tracing::instrument(name = "Submitting subscription to provider", skip_all)]
    pub async fn submit(&self, api_key: &SecretString, email: &str) -> SubmissionOutcome {
        let form_error = match self.subscribe_via_form(api_key, email).await {
            Attempt::Accepted { subscriber_id } => {
                return SubmissionOutcome::Success {
                    subscriber_id,
                    endpoint: Endpoint::Form,
                }
            }
            Attempt::Rejected { status, body } => {
                let reason = body
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_REJECTION_REASON)
                    .to_string();
                return SubmissionOutcome::Failure(SubmissionFailure::Rejected {
                    http_status: status,
                    reason,
                    details: body,
                });
            }
            Attempt::Unavailable { reason } => reason,
        };

        warn!(%form_error, "form endpoint unusable, trying the subscribers endpoint");

        match self.create_subscriber(api_key, email).await {
            Attempt::Accepted { subscriber_id } => SubmissionOutcome::Success {
                subscriber_id,
                endpoint: Endpoint::Subscribers,
            },
            Attempt::Rejected { status, body } => {
                SubmissionOutcome::Failure(SubmissionFailure::Unavailable {
                    form_error,
                    alt_error: format!("provider responded with {status}: {body}"),
                })
            }
            Attempt::Unavailable { reason } => {
                SubmissionOutcome::Failure(SubmissionFailure::Unavailable {
                    form_error,
                    alt_error: reason,
                })
            }
        }
    }

    /// `POST {base}/forms/{form_id}/subscribe`
    pub async fn subscribe_via_form(&self, api_key: &SecretString, email: &str) -> Attempt {
        let body = FormSubscription {
            api_key: api_key.expose_secret(),
            email,
        };
        self.post(Endpoint::Form, &body).await
    }

    /// `POST {base}/subscribers`
    pub async fn create_subscriber(&self, api_key: &SecretString, email: &str) -> Attempt {
        let body = SubscriberCreation {
            api_key: api_key.expose_secret(),
            email,
            first_name: "",
        };
        self.post(Endpoint::Subscribers, &body).await
    }

    async fn post<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Attempt {
        let url = self.url(endpoint).clone();
        debug!(endpoint = endpoint.as_ref(), %url, "sending request to provider");

        let resp = match self.http_client.post(url).json(body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                return Attempt::Unavailable {
                    reason: utils::error_chain_string(&e),
                }
            }
        };

        let status = resp.status();
        info!(endpoint = endpoint.as_ref(), %status, "provider responded");

        // Read the whole body as text first, the provider does not always send JSON.
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                return Attempt::Unavailable {
                    reason: utils::error_chain_string(&e),
                }
            }
        };
        debug!(endpoint = endpoint.as_ref(), body = %text, "provider response body");

        let data: Value = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                return Attempt::Unavailable {
                    reason: format!("unparseable response body (status {status}): {e}"),
                }
            }
        };

        if status.is_success() {
            Attempt::Accepted {
                subscriber_id: subscriber_id(endpoint, &data),
            }
        } else {
            Attempt::Rejected { status, body: data }
        }
    }
}

/// The form endpoint nests the subscriber under `subscription`.
fn subscriber_id(endpoint: Endpoint, data: &Value) -> Option<String> {
    let subscriber = match endpoint {
        Endpoint::Form => data.get("subscription")?.get("subscriber")?,
        Endpoint::Subscribers => data.get("subscriber")?,
    };

    match subscriber {
        Value::Object(fields) => fields.get("id").and_then(scalar_id),
        other => scalar_id(other),
    }
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[derive(Serialize)]
struct FormSubscription<'a> {
    api_key: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct SubscriberCreation<'a> {
    api_key: &'a str,
    email: &'a str,
    first_name: &'a str,
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse the provider url: {0}")]
    UrlParsing(String),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
