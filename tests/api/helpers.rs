//! Spawns the gateway on a random port with the provider replaced by a `MockServer`.
use std::{net::SocketAddr, sync::OnceLock, time::Duration};

use anyhow::Result;
use reqwest::{Method, Response};
use secrecy::SecretString;
use serde_json::Value;
use subscription_gateway::{
    config::{AppConfig, NetConfig, ProviderConfig},
    init_dbg_tracing, App,
};
use uuid::Uuid;
use wiremock::MockServer;

pub const FORM_ID: u64 = 7903890;
pub const FORM_PATH: &str = "/forms/7903890/subscribe";
pub const SUBSCRIBERS_PATH: &str = "/subscribers";
pub const TEST_API_KEY: &str = "sk_test_key";

/// Longer than the client timeout, used to fake an unreachable provider.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(3);

/// A JSON body larger than the server's default request body limit.
pub fn oversized_body() -> String {
    format!(
        "{{\"email\":\"{}@example.com\"}}",
        "a".repeat(3 * 1024 * 1024)
    )
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub provider_server: MockServer,
    pub http_client: reqwest::Client,
}

/// Set `TEST_LOG` to see the server logs.
fn init_test_subscriber() {
    static SUBSCRIBER: OnceLock<()> = OnceLock::new();
    SUBSCRIBER.get_or_init(|| {
        if std::env::var("TEST_LOG").is_ok() {
            init_dbg_tracing();
        }
    });
}

impl TestApp {
    /// App with a configured API key.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_api_key(Some(TEST_API_KEY)).await
    }

    /// `None` leaves the key unconfigured: nothing is pinned and the env var does not exist.
    pub async fn spawn_with_api_key(api_key: Option<&str>) -> Result<Self> {
        init_test_subscriber();

        let provider_server = MockServer::start().await;

        let config = AppConfig {
            net_config: NetConfig {
                host: [127, 0, 0, 1],
                // Trying to bind port 0 will trigger an OS scan for an available port
                app_port: 0,
            },
            provider_config: ProviderConfig {
                base_url: provider_server.uri(),
                form_id: FORM_ID,
                timeout_millis: Some(200),
                api_key: api_key.map(SecretString::from),
                api_key_env: format!("GATEWAY_TEST_UNSET_{}", Uuid::new_v4().simple()),
            },
        };

        let app = App::build_from_config(&config).await?;
        let addr = app.local_addr()?;

        tokio::spawn(subscription_gateway::serve(app));

        Ok(TestApp {
            addr,
            provider_server,
            http_client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn post_subscribe(&self, body: &Value) -> Result<Response> {
        let res = self
            .http_client
            .post(self.url("/subscribe"))
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn post_subscribe_raw(&self, body: &'static str) -> Result<Response> {
        let res = self
            .http_client
            .post(self.url("/subscribe"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn request_with_body(
        &self,
        method: Method,
        path: &str,
        body: String,
    ) -> Result<Response> {
        let res = self
            .http_client
            .request(method, self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn request(&self, method: Method, path: &str) -> Result<Response> {
        let res = self
            .http_client
            .request(method, self.url(path))
            .send()
            .await?;
        Ok(res)
    }

    /// Paths of the requests the provider received, in order.
    pub async fn provider_calls(&self) -> Vec<String> {
        self.provider_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|req| req.url.path().to_string())
            .collect()
    }
}

pub fn assert_cors(res: &Response) {
    let headers = res.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*"),
        "missing CORS origin header"
    );
}
