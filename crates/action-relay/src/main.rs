//! Action-Relay: run desktop actions from remote controls over TCP.

mod app;
mod config;
mod enigo_backend;
mod error;

pub(crate) use {
    app::App,
    enigo_backend::EnigoBackend,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use std::sync::Arc;

use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "action_relay=debug,action_relay_core=debug";

/// Application entry point.
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(async {
        let app = App::new(config, Arc::new(EnigoBackend::new()))?;
        app.run().await
    });

    if let Err(e) = result {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}
