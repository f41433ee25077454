//! Tests whether the 'health-check' route returns an appropriate status code

use anyhow::Result;
use reqwest::{Method, StatusCode};

use crate::helpers::TestApp;

#[tokio::test]
async fn healthcheck_ok() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.request(Method::GET, "/health-check").await?;

    assert!(res.status() == StatusCode::OK, "Healthcheck FAILED!");
    assert_eq!(res.content_length(), Some(0));

    Ok(())
}

#[tokio::test]
async fn invalid_path_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.request(Method::GET, "/invalidpath").await?;

    assert!(
        res.status() == StatusCode::NOT_FOUND,
        "Invalid Path check FAILED!, expected: {}, got: {}",
        404,
        res.status().as_u16()
    );

    Ok(())
}

#[tokio::test]
async fn responses_carry_a_request_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.request(Method::GET, "/health-check").await?;

    assert!(res.headers().get("x-request-id").is_some());

    Ok(())
}
