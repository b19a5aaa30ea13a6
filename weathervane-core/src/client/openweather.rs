use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{Endpoint, FailureReason, FetchFailure},
    model::{
        ConditionCategory, CurrentConditions, ForecastEntry, ForecastTimeline, Language, Location,
        Reading,
    },
};

use super::{WeatherClient, decode};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Talks to OpenWeather directly, metric units, one key per client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    /// City name or lat/lon, never both, followed by the fixed parameters.
    fn query(&self, location: &Location, language: Language) -> Vec<(&'static str, String)> {
        let mut query = match location {
            Location::City { name } => vec![("q", name.clone())],
            Location::Coords { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
        };
        query.push(("appid", self.api_key.clone()));
        query.push(("units", "metric".to_string()));
        query.push(("lang", language.as_str().to_string()));
        query
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        location: &Location,
        language: Language,
    ) -> Result<T, FetchFailure> {
        let path = match endpoint {
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
        };
        let url = format!("{}/{}", self.base_url, path);
        debug!(%endpoint, %location, %language, "querying OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&self.query(location, language))
            .send()
            .await
            .map_err(|e| {
                FetchFailure::new(endpoint, location, FailureReason::Network(e.without_url().to_string()))
            })?;

        decode(res).await.map_err(|reason| FetchFailure::new(endpoint, location, reason))
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_current(
        &self,
        location: &Location,
        language: Language,
    ) -> Result<CurrentConditions, FetchFailure> {
        let parsed: OwCurrentResponse = self.get(Endpoint::Current, location, language).await?;
        CurrentConditions::try_from(parsed)
            .map_err(|reason| FetchFailure::new(Endpoint::Current, location, reason))
    }

    async fn fetch_forecast(
        &self,
        location: &Location,
        language: Language,
    ) -> Result<ForecastTimeline, FetchFailure> {
        let parsed: OwForecastResponse = self.get(Endpoint::Forecast, location, language).await?;
        ForecastTimeline::try_from(parsed)
            .map_err(|reason| FetchFailure::new(Endpoint::Forecast, location, reason))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: i64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    #[serde(default)]
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn reading(
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
) -> Result<Reading, FailureReason> {
    let humidity_pct = u8::try_from(main.humidity)
        .ok()
        .filter(|h| *h <= 100)
        .ok_or_else(|| FailureReason::Parse(format!("humidity {} outside 0..=100", main.humidity)))?;

    let primary = weather
        .into_iter()
        .next()
        .ok_or_else(|| FailureReason::Parse("payload carries no weather condition".into()))?;

    Ok(Reading {
        temperature: main.temp,
        feels_like: main.feels_like,
        humidity_pct,
        pressure_hpa: main.pressure,
        wind_speed: wind.speed,
        wind_deg: wind.deg,
        condition: ConditionCategory::from(primary.main),
        description: primary.description,
        visibility_m: visibility,
    })
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, FailureReason> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| FailureReason::Parse(format!("timestamp {ts} out of range")))
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = FailureReason;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        Ok(CurrentConditions {
            name: parsed.name,
            country: parsed.sys.country,
            sunrise: unix_to_utc(parsed.sys.sunrise)?,
            sunset: unix_to_utc(parsed.sys.sunset)?,
            reading: reading(parsed.main, parsed.weather, parsed.wind, parsed.visibility)?,
        })
    }
}

impl TryFrom<OwForecastResponse> for ForecastTimeline {
    type Error = FailureReason;

    fn try_from(parsed: OwForecastResponse) -> Result<Self, Self::Error> {
        let entries = parsed
            .list
            .into_iter()
            .map(|entry| {
                Ok(ForecastEntry {
                    timestamp: unix_to_utc(entry.dt)?,
                    timestamp_text: entry.dt_txt,
                    reading: reading(entry.main, entry.weather, entry.wind, entry.visibility)?,
                })
            })
            .collect::<Result<Vec<_>, FailureReason>>()?;

        Ok(ForecastTimeline::new(entries))
    }
}
