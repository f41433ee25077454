use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::{
    provider_client::{Endpoint, SubmissionOutcome},
    web::{
        types::{Envelope, RequestError, SubscriptionRequest},
        Error, WebResult,
    },
    AppState,
};

/// `/subscribe`
///
/// OPTIONS is the CORS preflight and returns before anything else is looked at,
/// the body included. A body that could not be read is only an error for a POST.
/// A POST is validated, then the API key is resolved, then the provider is called.
/// Any failure along the way ends the request with the matching `Error`.
#[tracing::instrument(
    name = "Handling subscription request",
    skip(app_state, body),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    method: Method,
    State(app_state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> WebResult<Response> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }
    if method != Method::POST {
        return Err(Error::MethodNotAllowed);
    }

    let body = body.map_err(RequestError::from)?;
    let request = SubscriptionRequest::parse(&body)?;
    tracing::Span::current().record("subscriber_email", request.email());

    let api_key = app_state
        .api_key_source
        .resolve()
        .ok_or(Error::MissingApiKey)?;

    match app_state
        .provider_client
        .submit(&api_key, request.email())
        .await
    {
        SubmissionOutcome::Success {
            subscriber_id,
            endpoint,
        } => {
            info!(
                endpoint = endpoint.as_ref(),
                subscriber_id = subscriber_id.as_deref(),
                "SUCCESS"
            );
            let message = match endpoint {
                Endpoint::Form => "Subscription successful",
                Endpoint::Subscribers => "Subscription successful via alternative endpoint",
            };
            Ok((
                StatusCode::OK,
                Json(Envelope::subscribed(message, subscriber_id)),
            )
                .into_response())
        }
        SubmissionOutcome::Failure(failure) => Err(failure.into()),
    }
}
