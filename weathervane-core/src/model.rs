use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Where a fetch cycle points: a city name or a coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    City { name: String },
    Coords { lat: f64, lon: f64 },
}

impl Location {
    pub fn city(name: impl Into<String>) -> Self {
        Location::City { name: name.into() }
    }

    pub fn coords(lat: f64, lon: f64) -> Self {
        Location::Coords { lat, lon }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::City { name } => f.write_str(name),
            Location::Coords { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
        }
    }
}

/// Response language requested from the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::En, Language::Tr]
    }

    /// The other language of the en/tr pair.
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Tr,
            Language::Tr => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Language {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            _ => Err(anyhow::anyhow!("Unknown language '{value}'. Supported languages: en, tr.")),
        }
    }
}

/// Primary condition group as reported by the provider (`weather[0].main`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Smoke,
    Haze,
    Fog,
    /// Any group outside the known vocabulary, kept verbatim.
    Other(String),
}

impl ConditionCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionCategory::Clear => "Clear",
            ConditionCategory::Clouds => "Clouds",
            ConditionCategory::Rain => "Rain",
            ConditionCategory::Drizzle => "Drizzle",
            ConditionCategory::Thunderstorm => "Thunderstorm",
            ConditionCategory::Snow => "Snow",
            ConditionCategory::Mist => "Mist",
            ConditionCategory::Smoke => "Smoke",
            ConditionCategory::Haze => "Haze",
            ConditionCategory::Fog => "Fog",
            ConditionCategory::Other(raw) => raw,
        }
    }
}

impl From<&str> for ConditionCategory {
    fn from(value: &str) -> Self {
        match value {
            "Clear" => ConditionCategory::Clear,
            "Clouds" => ConditionCategory::Clouds,
            "Rain" => ConditionCategory::Rain,
            "Drizzle" => ConditionCategory::Drizzle,
            "Thunderstorm" => ConditionCategory::Thunderstorm,
            "Snow" => ConditionCategory::Snow,
            "Mist" => ConditionCategory::Mist,
            "Smoke" => ConditionCategory::Smoke,
            "Haze" => ConditionCategory::Haze,
            "Fog" => ConditionCategory::Fog,
            other => ConditionCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for ConditionCategory {
    fn from(value: String) -> Self {
        ConditionCategory::from(value.as_str())
    }
}

impl From<ConditionCategory> for String {
    fn from(value: ConditionCategory) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurements shared by current conditions and forecast entries.
/// Units are metric: °C, hPa, m/s, metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed: f64,
    pub wind_deg: f64,
    pub condition: ConditionCategory,
    pub description: String,
    pub visibility_m: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Display name of the resolved city, as returned upstream.
    pub name: String,
    pub country: String,
    pub reading: Reading,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// One 3-hour slot of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// Provider's textual timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp_text: String,
    pub reading: Reading,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastTimeline {
    pub entries: Vec<ForecastEntry>,
}

impl ForecastTimeline {
    pub fn new(entries: Vec<ForecastEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Representative forecast value for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub condition: ConditionCategory,
    pub temperature: i32,
}

/// Externally visible orchestrator state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    pub location: Option<Location>,
    pub current: Option<CurrentConditions>,
    pub daily: Vec<DailySample>,
    pub loading: bool,
    pub language: Language,
}

impl Snapshot {
    pub fn new(language: Language) -> Self {
        Self { language, ..Self::default() }
    }
}
