//! The acquisition state machine.
//!
//! `AcquisitionOrchestrator` owns the [`Snapshot`] and is the only writer of
//! it. Every fetch cycle carries a sequence number; only the completion of
//! the most recently issued cycle may touch the snapshot, so a slow response
//! for an old request can never overwrite newer data.
//!
//! The `start`/`search`/`change_language` methods drive one cycle to
//! completion. [`crate::service::OrchestratorService`] uses the same
//! transition methods to run overlapping cycles from an actor task.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    Config,
    client::{Capabilities, WeatherClient, client_from_config},
    error::FetchFailure,
    location::{FixedPosition, GeolocationMode, IpGeolocation, LocationResolver},
    model::{CurrentConditions, ForecastTimeline, Language, Location, Snapshot},
    sampler,
    suggestion::{Suggestion, suggest},
    theme::Theme,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Resolving,
    Fetching,
    Ready,
    Failed,
}

/// One coordinated current + forecast query pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCycle {
    pub seq: u64,
    pub location: Location,
    pub language: Language,
}

pub type CycleOutcome = Result<(CurrentConditions, ForecastTimeline), FetchFailure>;

/// What a trigger led to, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// The trigger was a no-op (empty search, same language, already started).
    NotTriggered,
    /// The cycle completed and its data is in the snapshot.
    Ready,
    /// A newer cycle was issued meanwhile; this result was dropped.
    Superseded,
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Published {
    pub phase: Phase,
    pub theme: Theme,
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub suggestion: Option<Suggestion>,
    pub error: Option<FetchFailure>,
    /// False when the weather source has no forecast, so `daily` stays empty.
    pub forecast_available: bool,
}

/// Issue both queries concurrently and wait for both.
pub async fn fetch_cycle(client: &dyn WeatherClient, cycle: &FetchCycle) -> CycleOutcome {
    let (current, forecast) = tokio::join!(
        client.fetch_current(&cycle.location, cycle.language),
        client.fetch_forecast(&cycle.location, cycle.language),
    );
    Ok((current?, forecast?))
}

#[derive(Debug)]
pub struct AcquisitionOrchestrator {
    client: Arc<dyn WeatherClient>,
    resolver: LocationResolver,
    phase: Phase,
    snapshot: Snapshot,
    theme: Theme,
    last_issued: u64,
    last_failure: Option<FetchFailure>,
}

impl AcquisitionOrchestrator {
    pub fn new(
        client: Arc<dyn WeatherClient>,
        resolver: LocationResolver,
        language: Language,
        theme: Theme,
    ) -> Self {
        Self {
            client,
            resolver,
            phase: Phase::Idle,
            snapshot: Snapshot::new(language),
            theme,
            last_issued: 0,
            last_failure: None,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    /// Number of fetch cycles issued so far.
    pub fn cycles_issued(&self) -> u64 {
        self.last_issued
    }

    pub fn suggestion(&self) -> Option<Suggestion> {
        suggest(self.snapshot.current.as_ref())
    }

    pub fn published(&self) -> Published {
        Published {
            phase: self.phase,
            theme: self.theme,
            snapshot: self.snapshot.clone(),
            suggestion: self.suggestion(),
            error: self.last_failure.clone(),
            forecast_available: self.client.capabilities().forecast,
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        debug!(theme = %self.theme, "theme toggled");
        self.theme
    }

    /// What the configured weather source can answer.
    pub fn capabilities(&self) -> Capabilities {
        self.client.capabilities()
    }

    pub(crate) fn client(&self) -> Arc<dyn WeatherClient> {
        Arc::clone(&self.client)
    }

    pub(crate) fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Startup: resolve the initial location, then run the first cycle.
    pub async fn start(&mut self) -> Result<CycleStatus, FetchFailure> {
        if !self.begin_resolving() {
            return Ok(CycleStatus::NotTriggered);
        }

        let location = self.resolver.resolve().await;
        match self.resolved(location) {
            Some(cycle) => self.run(cycle).await,
            None => Ok(CycleStatus::Superseded),
        }
    }

    /// Fetch for a user-entered city. Blank input does nothing.
    pub async fn search(&mut self, term: &str) -> Result<CycleStatus, FetchFailure> {
        match self.request_search(term) {
            Some(cycle) => self.run(cycle).await,
            None => Ok(CycleStatus::NotTriggered),
        }
    }

    /// Record the language and, if a city is already shown, refetch it.
    pub async fn change_language(&mut self, language: Language) -> Result<CycleStatus, FetchFailure> {
        match self.request_language(language) {
            Some(cycle) => self.run(cycle).await,
            None => Ok(CycleStatus::NotTriggered),
        }
    }

    async fn run(&mut self, cycle: FetchCycle) -> Result<CycleStatus, FetchFailure> {
        let outcome = fetch_cycle(self.client.as_ref(), &cycle).await;
        self.complete(&cycle, outcome)
    }

    pub(crate) fn begin_resolving(&mut self) -> bool {
        if self.phase != Phase::Idle {
            warn!(phase = ?self.phase, "startup requested twice; ignoring");
            return false;
        }
        self.snapshot.loading = true;
        self.transition(Phase::Resolving);
        true
    }

    /// `None` when a search already took over while resolving.
    pub(crate) fn resolved(&mut self, location: Location) -> Option<FetchCycle> {
        if self.phase != Phase::Resolving {
            debug!(%location, "initial location arrived after another request; dropping it");
            return None;
        }
        Some(self.begin_cycle(location, self.snapshot.language))
    }

    pub(crate) fn request_search(&mut self, term: &str) -> Option<FetchCycle> {
        let term = term.trim();
        if term.is_empty() {
            debug!("ignoring empty search");
            return None;
        }
        Some(self.begin_cycle(Location::city(term), self.snapshot.language))
    }

    pub(crate) fn request_language(&mut self, language: Language) -> Option<FetchCycle> {
        if language == self.snapshot.language {
            return None;
        }
        info!(from = %self.snapshot.language, to = %language, "language changed");
        self.snapshot.language = language;

        let name = self.shown_city()?;
        Some(self.begin_cycle(Location::city(name), language))
    }

    /// After `cycle` landed in a language that was changed while it was in
    /// flight, refetch the same city in the selected language.
    pub(crate) fn catch_up_language(&mut self, cycle: &FetchCycle) -> Option<FetchCycle> {
        if cycle.seq != self.last_issued || cycle.language == self.snapshot.language {
            return None;
        }
        let name = self.shown_city()?;
        debug!(seq = cycle.seq, language = %self.snapshot.language, "result arrived in the previous language");
        Some(self.begin_cycle(Location::city(name), self.snapshot.language))
    }

    /// Name of the city currently shown; upstream reports `""` for unnamed places.
    fn shown_city(&self) -> Option<String> {
        self.snapshot
            .current
            .as_ref()
            .map(|current| current.name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    fn begin_cycle(&mut self, location: Location, language: Language) -> FetchCycle {
        self.last_issued += 1;
        self.snapshot.loading = true;
        self.transition(Phase::Fetching);

        let cycle = FetchCycle { seq: self.last_issued, location, language };
        info!(seq = cycle.seq, location = %cycle.location, language = %cycle.language, "fetch cycle issued");
        cycle
    }

    /// Apply a finished cycle. Failures are recorded and handed back; the
    /// previous conditions and samples stay in place.
    pub(crate) fn complete(
        &mut self,
        cycle: &FetchCycle,
        outcome: CycleOutcome,
    ) -> Result<CycleStatus, FetchFailure> {
        if cycle.seq != self.last_issued {
            debug!(seq = cycle.seq, latest = self.last_issued, "dropping result of superseded cycle");
            return Ok(CycleStatus::Superseded);
        }

        self.snapshot.loading = false;

        match outcome {
            Ok((current, timeline)) => {
                let daily = sampler::sample(&timeline);
                info!(
                    seq = cycle.seq,
                    city = %current.name,
                    samples = daily.len(),
                    "fetch cycle ready"
                );
                self.snapshot.location = Some(cycle.location.clone());
                self.snapshot.current = Some(current);
                self.snapshot.daily = daily;
                self.last_failure = None;
                self.transition(Phase::Ready);
                Ok(CycleStatus::Ready)
            }
            Err(failure) => {
                warn!(seq = cycle.seq, error = %failure, "fetch cycle failed");
                self.last_failure = Some(failure.clone());
                self.transition(Phase::Failed);
                Err(failure)
            }
        }
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }
}

/// Wire client and resolver from configuration. A client that cannot query
/// by coordinates gets no geolocation at all.
pub fn orchestrator_from_config(config: &Config) -> anyhow::Result<AcquisitionOrchestrator> {
    let client = client_from_config(config)?;

    let resolver = match (config.position, config.geolocation) {
        _ if !client.capabilities().coordinates => LocationResolver::without_geolocation(),
        (Some(position), _) => LocationResolver::new(FixedPosition(position)),
        (None, GeolocationMode::Ip) => LocationResolver::new(IpGeolocation::new()),
        (None, GeolocationMode::Off) => LocationResolver::without_geolocation(),
    };

    Ok(AcquisitionOrchestrator::new(client, resolver, config.language, config.theme))
}
