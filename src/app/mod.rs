use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{config::AppConfig, credential::ApiKeySource, ProviderClient, Result};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Builds the provider client and binds the listener. Port `0` picks a free port.
    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let provider_config = &config.provider_config;

        let provider_client = ProviderClient::new(
            &provider_config.base_url,
            provider_config.form_id,
            provider_config.timeout(),
        )?;
        let api_key_source = ApiKeySource::from_config(provider_config);

        let app_state = AppState::new(provider_client, api_key_source);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        Ok(App::new(app_state, listener))
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState {
    pub provider_client: ProviderClient,
    pub api_key_source: ApiKeySource,
}

/// Application state shared by all requests, it is read-only.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(provider_client: ProviderClient, api_key_source: ApiKeySource) -> Self {
        AppState(Arc::new(InternalState {
            provider_client,
            api_key_source,
        }))
    }
}
