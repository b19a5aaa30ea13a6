//! In-memory collaborators for orchestrator and service tests.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::Notify;

use crate::{
    client::WeatherClient,
    error::{Endpoint, FailureReason, FetchFailure, GeolocationUnavailable},
    location::{Coordinates, GeolocationSource},
    model::{
        ConditionCategory, CurrentConditions, ForecastEntry, ForecastTimeline, Language, Location,
        Reading,
    },
};

pub(crate) type Call = (Endpoint, Location, Language);

/// Answers every query with plausible data and records what was asked.
/// Coordinates resolve to "Ankara"; descriptions follow the language.
#[derive(Debug, Default)]
pub(crate) struct ScriptedClient {
    calls: Mutex<Vec<Call>>,
    failing_forecasts: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl ScriptedClient {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub(crate) fn fail_forecast_for(&self, city: &str) {
        self.failing_forecasts.lock().unwrap().insert(city.to_string());
    }

    /// Hold current-conditions answers for `city` until the returned handle is notified.
    pub(crate) fn gate(&self, city: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(city.to_string(), notify.clone());
        notify
    }

    /// Release a gate for good: waiting and later queries for `city` pass.
    pub(crate) fn open(&self, city: &str) {
        if let Some(gate) = self.gates.lock().unwrap().remove(city) {
            gate.notify_one();
        }
    }

    pub(crate) fn payload_for(
        &self,
        location: &Location,
        language: Language,
    ) -> (CurrentConditions, ForecastTimeline) {
        (conditions_for(location, language), five_day_timeline())
    }

    fn record(&self, endpoint: Endpoint, location: &Location, language: Language) {
        self.calls.lock().unwrap().push((endpoint, location.clone(), language));
    }
}

#[async_trait]
impl WeatherClient for ScriptedClient {
    async fn fetch_current(
        &self,
        location: &Location,
        language: Language,
    ) -> Result<CurrentConditions, FetchFailure> {
        self.record(Endpoint::Current, location, language);

        let gate = self.gates.lock().unwrap().get(&location.to_string()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        Ok(conditions_for(location, language))
    }

    async fn fetch_forecast(
        &self,
        location: &Location,
        language: Language,
    ) -> Result<ForecastTimeline, FetchFailure> {
        self.record(Endpoint::Forecast, location, language);

        if self.failing_forecasts.lock().unwrap().contains(&location.to_string()) {
            return Err(FetchFailure::new(
                Endpoint::Forecast,
                location,
                FailureReason::Status { status: 404, body: "city not found".into() },
            ));
        }

        Ok(five_day_timeline())
    }
}

pub(crate) fn conditions_for(location: &Location, language: Language) -> CurrentConditions {
    let name = match location {
        Location::City { name } => name.clone(),
        Location::Coords { .. } => "Ankara".to_string(),
    };
    let description = match language {
        Language::En => "clear sky",
        Language::Tr => "açık",
    };

    CurrentConditions {
        name,
        country: "XX".into(),
        reading: Reading {
            temperature: 20.0,
            feels_like: 19.5,
            humidity_pct: 40,
            pressure_hpa: 1014.0,
            wind_speed: 3.2,
            wind_deg: 200.0,
            condition: ConditionCategory::Clear,
            description: description.into(),
            visibility_m: Some(10_000),
        },
        sunrise: Utc.with_ymd_and_hms(2024, 5, 1, 3, 30, 0).unwrap(),
        sunset: Utc.with_ymd_and_hms(2024, 5, 1, 17, 10, 0).unwrap(),
    }
}

/// 40 slots, 3 hours apart, from 2024-05-01 00:00 UTC.
pub(crate) fn five_day_timeline() -> ForecastTimeline {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let entries = (0..40)
        .map(|slot| {
            let at = start + Duration::hours(slot * 3);
            ForecastEntry {
                timestamp: at,
                timestamp_text: at.format("%Y-%m-%d %H:%M:%S").to_string(),
                reading: Reading {
                    temperature: 15.0 + (slot % 8) as f64,
                    feels_like: 15.0,
                    humidity_pct: 55,
                    pressure_hpa: 1010.0,
                    wind_speed: 4.0,
                    wind_deg: 90.0,
                    condition: ConditionCategory::Clouds,
                    description: "few clouds".into(),
                    visibility_m: None,
                },
            }
        })
        .collect();
    ForecastTimeline::new(entries)
}

/// Geolocation stub that counts how often it was asked.
#[derive(Debug)]
pub(crate) struct CountingGeolocation {
    position: Option<Coordinates>,
    calls: AtomicUsize,
}

impl CountingGeolocation {
    pub(crate) fn denied() -> Self {
        Self { position: None, calls: AtomicUsize::new(0) }
    }

    pub(crate) fn at(lat: f64, lon: f64) -> Self {
        Self { position: Some(Coordinates { lat, lon }), calls: AtomicUsize::new(0) }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationSource for CountingGeolocation {
    async fn position(&self) -> Result<Coordinates, GeolocationUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.position.ok_or(GeolocationUnavailable::Denied)
    }
}
