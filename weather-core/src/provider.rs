use crate::{Config, model::WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

/// Diagnostic detail for a failed lookup. Never shown to the user; the lookup
/// machine collapses every variant into the same fixed reason.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The wrapped error never carries the request URL, which holds the API key.
    #[error("request to weather provider failed: {0}")]
    Transport(reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected weather provider response: {0}")]
    Parse(String),
}

impl LookupError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a free-text location query.
    async fn current(&self, query: &str) -> Result<WeatherReading, LookupError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::with_base_url(api_key.to_owned(), config.base_url());
    Ok(Arc::new(provider))
}
