//! Interactive `configure` command.

use anyhow::bail;
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::info;
use weathervane_core::{
    ClientMode, Config, Language, Theme,
    config::API_KEY_ENV,
    location::GeolocationMode,
};

pub fn run() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let mode = select("Weather source:", ClientMode::all(), config.client)?;
    match mode {
        ClientMode::Direct => {
            let key = Password::new("OpenWeather API key:")
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_help_message("Leave empty to keep the stored key")
                .prompt()?;

            match (key.trim(), config.api_key.clone()) {
                ("", Some(stored)) => config.use_direct(stored),
                ("", None) if std::env::var(API_KEY_ENV).is_ok() => config.client = ClientMode::Direct,
                ("", None) => bail!("An API key is required for direct mode (or set {API_KEY_ENV})."),
                (key, _) => config.use_direct(key.to_string()),
            }
        }
        ClientMode::Proxy => {
            let url = Text::new("Proxy URL:")
                .with_initial_value(config.proxy_url.as_deref().unwrap_or(""))
                .with_help_message("GET <url>?city=<name> must answer with OpenWeather JSON")
                .prompt()?;

            let url = url.trim();
            if url.is_empty() {
                bail!("A proxy URL is required for proxy mode.");
            }
            config.use_proxy(url.to_string());
        }
    }

    config.language = select("Language:", Language::all(), config.language)?;
    config.theme = select("Theme:", Theme::all(), config.theme)?;
    if mode == ClientMode::Direct && config.position.is_none() {
        config.geolocation = select("Locate me by IP address:", GeolocationMode::all(), config.geolocation)?;
    }

    let path = config.save()?;
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

/// Select from `options` with the cursor on the current value.
fn select<T>(message: &str, options: &[T], current: T) -> anyhow::Result<T>
where
    T: Copy + PartialEq + std::fmt::Display,
{
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    let choice = Select::new(message, options.to_vec()).with_starting_cursor(cursor).prompt()?;
    Ok(choice)
}
