use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use crate::helpers::{assert_cors, oversized_body, TestApp};

#[tokio::test]
async fn notification_is_acknowledged() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(app.url("/submission-created"))
        .json(&json!({
            "payload": { "email": "ursula@example.com", "form_name": "newsletter" }
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_cors(&res);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Form submission received" }));
    assert!(app.provider_calls().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn malformed_notification_is_a_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        ("{".to_string(), "Not JSON"),
        (json!({}).to_string(), "Missing payload"),
        (String::new(), "Empty body"),
    ];

    for (body, description) in cases {
        let res = app
            .http_client
            .post(app.url("/submission-created"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST, the body was: {description}."
        );
        let body: Value = res.json().await?;
        assert_eq!(body, json!({ "success": false, "error": "Invalid request body" }));
    }

    Ok(())
}

#[tokio::test]
async fn oversized_notification_is_a_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .request_with_body(Method::POST, "/submission-created", oversized_body())
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_cors(&res);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "success": false, "error": "Invalid request body" }));

    Ok(())
}

#[tokio::test]
async fn only_post_is_allowed() -> Result<()> {
    let app = TestApp::spawn().await?;

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let res = app.request(method.clone(), "/submission-created").await?;
        assert_eq!(
            res.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "Wrong response for method {method}"
        );
    }

    Ok(())
}
