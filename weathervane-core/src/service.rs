//! Actor wrapper that lets fetch cycles overlap.
//!
//! The orchestrator lives on a single task. Resolution and fetch cycles run
//! as spawned tasks and report back here, where they are applied in the
//! order they finish; the orchestrator's sequence check discards anything
//! that was superseded in the meantime.

use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::{JoinError, JoinHandle, JoinSet},
};
use tracing::{debug, warn};

use crate::{
    model::{Language, Location},
    orchestrator::{
        AcquisitionOrchestrator, CycleOutcome, CycleStatus, FetchCycle, Published, fetch_cycle,
    },
    theme::Theme,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("orchestrator service has stopped")]
pub struct ServiceStopped;

#[derive(Debug)]
enum Command {
    Start,
    Search(String),
    ChangeLanguage(Language),
    ToggleLanguage,
    ToggleTheme,
}

enum Completion {
    Resolved(Location),
    Fetched(FetchCycle, CycleOutcome),
}

enum Event {
    Command(Option<(Command, oneshot::Sender<()>)>),
    Joined(Result<Completion, JoinError>),
}

/// Cheap to clone; the service stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    commands: mpsc::UnboundedSender<(Command, oneshot::Sender<()>)>,
    published: watch::Receiver<Published>,
}

impl OrchestratorHandle {
    /// Each request returns once the orchestrator has taken it in, so a
    /// following [`wait_idle`](Self::wait_idle) observes its effect.
    async fn send(&self, command: Command) -> Result<(), ServiceStopped> {
        let (ack, acked) = oneshot::channel();
        self.commands.send((command, ack)).map_err(|_| ServiceStopped)?;
        acked.await.map_err(|_| ServiceStopped)
    }

    pub async fn start(&self) -> Result<(), ServiceStopped> {
        self.send(Command::Start).await
    }

    pub async fn search(&self, term: impl Into<String>) -> Result<(), ServiceStopped> {
        self.send(Command::Search(term.into())).await
    }

    pub async fn change_language(&self, language: Language) -> Result<(), ServiceStopped> {
        self.send(Command::ChangeLanguage(language)).await
    }

    pub async fn toggle_language(&self) -> Result<(), ServiceStopped> {
        self.send(Command::ToggleLanguage).await
    }

    pub async fn toggle_theme(&self) -> Result<(), ServiceStopped> {
        self.send(Command::ToggleTheme).await
    }

    pub fn current(&self) -> Published {
        self.published.borrow().clone()
    }

    pub fn theme(&self) -> Theme {
        self.published.borrow().theme
    }

    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.published.clone()
    }

    /// Wait until nothing is loading and return that state.
    pub async fn wait_idle(&self) -> Result<Published, ServiceStopped> {
        let mut rx = self.published.clone();
        let published = rx.wait_for(|p| !p.snapshot.loading).await.map_err(|_| ServiceStopped)?;
        Ok(published.clone())
    }
}

pub struct OrchestratorService {
    orchestrator: AcquisitionOrchestrator,
    commands: mpsc::UnboundedReceiver<(Command, oneshot::Sender<()>)>,
    published: watch::Sender<Published>,
    tasks: JoinSet<Completion>,
}

impl OrchestratorService {
    pub fn spawn(orchestrator: AcquisitionOrchestrator) -> (OrchestratorHandle, JoinHandle<()>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (published_tx, published_rx) = watch::channel(orchestrator.published());

        let service = Self {
            orchestrator,
            commands: commands_rx,
            published: published_tx,
            tasks: JoinSet::new(),
        };
        let task = tokio::spawn(service.run());

        (OrchestratorHandle { commands: commands_tx, published: published_rx }, task)
    }

    async fn run(mut self) {
        loop {
            let event = tokio::select! {
                command = self.commands.recv() => Event::Command(command),
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => Event::Joined(joined),
            };

            match event {
                Event::Command(Some((command, ack))) => {
                    self.handle(command);
                    self.publish();
                    let _ = ack.send(());
                }
                Event::Command(None) => break,
                Event::Joined(Ok(completion)) => {
                    self.apply(completion);
                    self.publish();
                }
                Event::Joined(Err(err)) => warn!(error = %err, "orchestrator task ended abnormally"),
            }
        }
        debug!("orchestrator service stopped");
    }

    fn handle(&mut self, command: Command) {
        debug!(?command, "orchestrator command");

        let cycle = match command {
            Command::Start => {
                if self.orchestrator.begin_resolving() {
                    let resolver = self.orchestrator.resolver().clone();
                    self.tasks.spawn(async move { Completion::Resolved(resolver.resolve().await) });
                }
                None
            }
            Command::Search(term) => self.orchestrator.request_search(&term),
            Command::ChangeLanguage(language) => self.orchestrator.request_language(language),
            Command::ToggleLanguage => {
                let language = self.orchestrator.snapshot().language.toggled();
                self.orchestrator.request_language(language)
            }
            Command::ToggleTheme => {
                self.orchestrator.toggle_theme();
                None
            }
        };

        if let Some(cycle) = cycle {
            self.spawn_cycle(cycle);
        }
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Resolved(location) => {
                if let Some(cycle) = self.orchestrator.resolved(location) {
                    self.spawn_cycle(cycle);
                }
            }
            Completion::Fetched(cycle, outcome) => {
                // Failures are kept in the published state.
                let next = match self.orchestrator.complete(&cycle, outcome) {
                    Ok(CycleStatus::Ready) => self.orchestrator.catch_up_language(&cycle),
                    _ => None,
                };
                if let Some(next) = next {
                    self.spawn_cycle(next);
                }
            }
        }
    }

    fn spawn_cycle(&mut self, cycle: FetchCycle) {
        let client = self.orchestrator.client();
        self.tasks.spawn(async move {
            let outcome = fetch_cycle(client.as_ref(), &cycle).await;
            Completion::Fetched(cycle, outcome)
        });
    }

    fn publish(&self) {
        self.published.send_replace(self.orchestrator.published());
    }
}
