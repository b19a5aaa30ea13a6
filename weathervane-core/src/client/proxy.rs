use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::{Endpoint, FailureReason, FetchFailure},
    model::{CurrentConditions, ForecastTimeline, Language, Location},
};

use super::{Capabilities, WeatherClient, decode, openweather::OwCurrentResponse};

/// Client for the serverless pass-through (`GET <endpoint>?city=<name>`).
///
/// The proxy only forwards the current-conditions query, always in its own
/// language, so this client has no forecast, no localization and no
/// coordinate lookups.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    endpoint: String,
    http: Client,
}

impl ProxyClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }
}

#[async_trait]
impl WeatherClient for ProxyClient {
    fn capabilities(&self) -> Capabilities {
        Capabilities { forecast: false, localized: false, coordinates: false }
    }

    async fn fetch_current(
        &self,
        location: &Location,
        language: Language,
    ) -> Result<CurrentConditions, FetchFailure> {
        let fail = |reason| FetchFailure::new(Endpoint::Current, location, reason);

        let Location::City { name } = location else {
            return Err(fail(FailureReason::Unsupported("the proxy only accepts city queries")));
        };
        debug!(city = %name, %language, "querying weather proxy; response language is fixed by the proxy");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("city", name.as_str())])
            .send()
            .await
            .map_err(|e| fail(FailureReason::Network(e.without_url().to_string())))?;

        let parsed: OwCurrentResponse = decode(res).await.map_err(fail)?;
        CurrentConditions::try_from(parsed).map_err(fail)
    }

    async fn fetch_forecast(
        &self,
        location: &Location,
        _language: Language,
    ) -> Result<ForecastTimeline, FetchFailure> {
        debug!(%location, "proxy exposes no forecast endpoint; returning an empty timeline");
        Ok(ForecastTimeline::default())
    }
}
