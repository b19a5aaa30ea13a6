//! Initial target resolution: device position when available, a fixed city otherwise.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, info, warn};

use crate::{error::GeolocationUnavailable, model::Location};

/// City used whenever no position can be obtained.
pub const DEFAULT_CITY: &str = "Istanbul";

pub const IP_API_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeolocationUnavailable> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeolocationUnavailable::Failed(format!(
                "coordinates out of range: {lat}, {lon}"
            )));
        }
        Ok(Self { lat, lon })
    }
}

/// One-shot position query. Every failure collapses to [`GeolocationUnavailable`].
#[async_trait]
pub trait GeolocationSource: Send + Sync + Debug {
    async fn position(&self) -> Result<Coordinates, GeolocationUnavailable>;
}

/// Host without any geolocation facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl GeolocationSource for Unsupported {
    async fn position(&self) -> Result<Coordinates, GeolocationUnavailable> {
        Err(GeolocationUnavailable::Unsupported)
    }
}

/// Position supplied up front (config file or command line).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl GeolocationSource for FixedPosition {
    async fn position(&self) -> Result<Coordinates, GeolocationUnavailable> {
        Ok(self.0)
    }
}

/// Coarse position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocation {
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpGeolocation {
    pub fn new() -> Self {
        Self::with_endpoint(IP_API_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }
}

impl Default for IpGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeolocationSource for IpGeolocation {
    async fn position(&self) -> Result<Coordinates, GeolocationUnavailable> {
        let res = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| GeolocationUnavailable::Failed(e.without_url().to_string()))?;

        if !res.status().is_success() {
            return Err(GeolocationUnavailable::Failed(format!("lookup answered with status {}", res.status())));
        }

        let body: IpApiResponse = res.json().await.map_err(|e| GeolocationUnavailable::Failed(e.to_string()))?;
        if body.status != "success" {
            return Err(GeolocationUnavailable::Failed(body.message.unwrap_or_else(|| "lookup refused".into())));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => Err(GeolocationUnavailable::Failed("lookup returned no coordinates".into())),
        }
    }
}

/// Geolocation preference stored in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationMode {
    Off,
    #[default]
    Ip,
}

impl GeolocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeolocationMode::Off => "off",
            GeolocationMode::Ip => "ip",
        }
    }

    pub const fn all() -> &'static [GeolocationMode] {
        &[GeolocationMode::Ip, GeolocationMode::Off]
    }
}

impl std::fmt::Display for GeolocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    source: Arc<dyn GeolocationSource>,
}

impl LocationResolver {
    pub fn new(source: impl GeolocationSource + 'static) -> Self {
        Self { source: Arc::new(source) }
    }

    pub fn from_source(source: Arc<dyn GeolocationSource>) -> Self {
        Self { source }
    }

    pub fn without_geolocation() -> Self {
        Self::new(Unsupported)
    }

    /// Never fails: any geolocation problem falls back to [`DEFAULT_CITY`].
    pub async fn resolve(&self) -> Location {
        debug!(source = ?self.source, "resolving initial location");

        match self.source.position().await {
            Ok(Coordinates { lat, lon }) => {
                info!(lat, lon, "resolved location from geolocation");
                Location::coords(lat, lon)
            }
            Err(err) => {
                warn!(error = %err, fallback = DEFAULT_CITY, "geolocation unavailable");
                Location::city(DEFAULT_CITY)
            }
        }
    }
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::without_geolocation()
    }
}
