//! Core library for the `weathervane` app.
//!
//! This crate defines:
//! - The acquisition orchestrator (location → current + forecast → daily samples)
//! - Weather clients for OpenWeather and for the serverless proxy
//! - Location resolution with a fixed fallback city
//! - Configuration & credentials handling
//!
//! It is used by `weathervane-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod orchestrator;
pub mod sampler;
pub mod service;
pub mod suggestion;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Capabilities, ClientMode, WeatherClient, client_from_config};
pub use config::Config;
pub use error::{Endpoint, FailureReason, FetchFailure, GeolocationUnavailable};
pub use location::{DEFAULT_CITY, LocationResolver};
pub use model::{
    ConditionCategory, CurrentConditions, DailySample, ForecastTimeline, Language, Location,
    Snapshot,
};
pub use orchestrator::{
    AcquisitionOrchestrator, CycleStatus, Phase, Published, orchestrator_from_config,
};
pub use service::{OrchestratorHandle, OrchestratorService};
pub use suggestion::{Suggestion, suggest};
pub use theme::{Palette, Theme};
