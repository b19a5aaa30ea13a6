use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::Location;

/// Which of the two upstream queries a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum FailureReason {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed payload: {0}")]
    Parse(String),

    #[error("not supported: {0}")]
    Unsupported(&'static str),
}

/// A failed upstream query. Never retried.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{endpoint} request for {location} failed: {reason}")]
pub struct FetchFailure {
    pub endpoint: Endpoint,
    pub location: Location,
    pub reason: FailureReason,
}

impl FetchFailure {
    pub fn new(endpoint: Endpoint, location: &Location, reason: FailureReason) -> Self {
        Self { endpoint, location: location.clone(), reason }
    }
}

/// Why a position could not be obtained. Never leaves the location resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationUnavailable {
    #[error("location permission denied")]
    Denied,

    #[error("no geolocation source on this host")]
    Unsupported,

    #[error("geolocation failed: {0}")]
    Failed(String),
}
