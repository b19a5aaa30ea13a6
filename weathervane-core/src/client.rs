use crate::{
    Config,
    client::{openweather::OpenWeatherClient, proxy::ProxyClient},
    error::{FailureReason, FetchFailure},
    model::{CurrentConditions, ForecastTimeline, Language, Location},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod openweather;
pub mod proxy;

/// How the app reaches the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    /// Straight to OpenWeather with our own API key.
    #[default]
    Direct,
    /// Through the serverless proxy, which holds the key.
    Proxy,
}

impl ClientMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientMode::Direct => "direct",
            ClientMode::Proxy => "proxy",
        }
    }

    pub const fn all() -> &'static [ClientMode] {
        &[ClientMode::Direct, ClientMode::Proxy]
    }
}

impl std::fmt::Display for ClientMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ClientMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "direct" | "openweather" => Ok(ClientMode::Direct),
            "proxy" => Ok(ClientMode::Proxy),
            _ => Err(anyhow::anyhow!(
                "Unknown client mode '{value}'. Supported modes: direct, proxy."
            )),
        }
    }
}

/// What a client can actually deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub forecast: bool,
    pub localized: bool,
    pub coordinates: bool,
}

impl Capabilities {
    pub const FULL: Capabilities = Capabilities { forecast: true, localized: true, coordinates: true };
}

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }

    async fn fetch_current(
        &self,
        location: &Location,
        language: Language,
    ) -> Result<CurrentConditions, FetchFailure>;

    async fn fetch_forecast(
        &self,
        location: &Location,
        language: Language,
    ) -> Result<ForecastTimeline, FetchFailure>;
}

/// Construct the client selected by `config.client`.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherClient>> {
    let client: Arc<dyn WeatherClient> = match config.client {
        ClientMode::Direct => {
            let api_key = config.resolved_api_key().ok_or_else(|| {
                anyhow::anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weathervane configure` or set {}.",
                    crate::config::API_KEY_ENV
                )
            })?;

            match config.api_base_url.as_deref() {
                Some(base) => Arc::new(OpenWeatherClient::with_base_url(api_key, base)),
                None => Arc::new(OpenWeatherClient::new(api_key)),
            }
        }
        ClientMode::Proxy => {
            let endpoint = config.proxy_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!(
                    "Proxy mode selected but no proxy URL configured.\n\
                     Hint: run `weathervane configure` and enter the proxy endpoint."
                )
            })?;
            Arc::new(ProxyClient::new(endpoint))
        }
    };

    Ok(client)
}

/// Read a response body and decode it, mapping every failure to a reason.
pub(crate) async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, FailureReason> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| FailureReason::Network(e.without_url().to_string()))?;

    if !status.is_success() {
        return Err(FailureReason::Status { status: status.as_u16(), body: truncate_body(&body) });
    }

    serde_json::from_str(&body).map_err(|e| FailureReason::Parse(e.to_string()))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn client_mode_as_str_roundtrip() {
        for mode in ClientMode::all() {
            let parsed = ClientMode::try_from(mode.as_str()).expect("roundtrip should succeed");
            assert_eq!(*mode, parsed);
        }
    }

    #[test]
    fn openweather_alias_selects_direct() {
        assert_eq!(ClientMode::try_from("OpenWeather").unwrap(), ClientMode::Direct);
    }

    #[test]
    fn unknown_client_mode_error() {
        let err = ClientMode::try_from("carrier-pigeon").unwrap_err();
        assert!(err.to_string().contains("Unknown client mode"));
    }

    #[test]
    fn proxy_mode_requires_url() {
        let cfg = Config { client: ClientMode::Proxy, ..Config::default() };
        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("no proxy URL configured"));
    }

    #[test]
    fn proxy_client_reports_reduced_capabilities() {
        let cfg = Config {
            client: ClientMode::Proxy,
            proxy_url: Some("https://example.org/.netlify/functions/api".into()),
            ..Config::default()
        };
        let client = client_from_config(&cfg).expect("proxy client");
        let caps = client.capabilities();
        assert!(!caps.forecast && !caps.localized && !caps.coordinates);
    }

    #[test]
    fn direct_client_with_stored_key() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        let client = client_from_config(&cfg).expect("direct client");
        assert_eq!(client.capabilities(), Capabilities::FULL);
    }

    #[test]
    fn truncate_long_bodies_on_char_boundary() {
        let body = "ş".repeat(250);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
