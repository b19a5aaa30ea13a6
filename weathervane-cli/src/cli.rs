use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use weathervane_core::{
    Config, Language, Theme, location::Coordinates, orchestrator_from_config,
};

use crate::{
    configure,
    render::{RenderOptions, render},
    session,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathervane", version, about = "Current weather and a five-day outlook")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the weather source, credentials and display preferences.
    Configure,

    /// Show weather once: for CITY, or for the current location when omitted.
    Show {
        /// City name to search for.
        city: Option<String>,

        #[command(flatten)]
        overrides: Overrides,

        /// Print the published state as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Keep a session open: search, switch language, toggle theme.
    Interactive {
        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Per-run overrides of the stored configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Response and label language ("en" or "tr").
    #[arg(long, value_parser = parse_language)]
    pub lang: Option<Language>,

    /// Use the dark palette.
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Use the light palette.
    #[arg(long)]
    pub light: bool,

    /// Fixed latitude instead of geolocation.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Fixed longitude instead of geolocation.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

fn parse_language(value: &str) -> anyhow::Result<Language> {
    Language::try_from(value)
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(language) = self.lang {
            config.language = language;
        }
        if self.dark {
            config.theme = Theme::Dark;
        } else if self.light {
            config.theme = Theme::Light;
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            config.position = Some(Coordinates::new(lat, lon).context("Invalid --lat/--lon")?);
        }
        Ok(())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure::run(),
            Command::Show { city, overrides, json } => show(city, &overrides, json).await,
            Command::Interactive { overrides } => {
                let config = load_config(&overrides)?;
                let orchestrator = orchestrator_from_config(&config)?;
                session::run(orchestrator, RenderOptions::for_stdout()).await
            }
        }
    }
}

fn load_config(overrides: &Overrides) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    overrides.apply(&mut config)?;
    debug!(client = %config.client, language = %config.language, theme = %config.theme, "effective configuration");
    Ok(config)
}

async fn show(city: Option<String>, overrides: &Overrides, json: bool) -> anyhow::Result<()> {
    if city.as_deref().is_some_and(|c| c.trim().is_empty()) {
        bail!("City name must not be empty.");
    }

    let config = load_config(overrides)?;
    let mut orchestrator = orchestrator_from_config(&config)?;

    if !orchestrator.capabilities().localized && config.language != Language::default() {
        warn!(language = %config.language, "this weather source ignores the language; only labels are translated");
    }

    let outcome = match city {
        Some(city) => orchestrator.search(&city).await,
        None => orchestrator.start().await,
    };
    let published = orchestrator.published();

    if json {
        println!("{}", serde_json::to_string_pretty(&published)?);
    }

    outcome?;
    if !json {
        print!("{}", render(&published, &RenderOptions::for_stdout()));
    }
    Ok(())
}
