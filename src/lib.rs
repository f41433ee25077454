//! A small gateway that forwards newsletter sign-ups to a mailing-list provider.
//!
//! `POST /subscribe` takes `{"email": ...}` and submits it to the provider's form
//! endpoint, falling back to the direct subscriber endpoint once when the form
//! endpoint is unreachable or answers with something that is not JSON.

pub mod app;
pub mod config;
pub mod credential;
mod error;
pub mod provider_client;
pub mod utils;
pub mod web;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

// re-export
pub use app::{App, AppState};
pub use error::{Error, Result};
pub use provider_client::ProviderClient;
pub use web::serve::serve;

/// Human readable tracing for development, `RUST_LOG` overrides the `debug` default.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();
}

/// Production tracing, no ANSI colors, `RUST_LOG` overrides the `info` default.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
