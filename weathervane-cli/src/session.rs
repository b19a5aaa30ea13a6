//! `interactive` command: a prompt loop over the orchestrator service.

use std::fmt;

use inquire::{InquireError, Select, Text};
use tokio::task;
use tracing::debug;
use weathervane_core::{AcquisitionOrchestrator, OrchestratorService, Published};

use crate::{
    labels::Labels,
    render::{RenderOptions, render},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    SwitchLanguage,
    ToggleTheme,
    Quit,
}

/// Menu line shown in the current label language.
#[derive(Debug, Clone, Copy)]
struct MenuEntry {
    action: Action,
    label: &'static str,
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

fn menu(labels: &Labels) -> Vec<MenuEntry> {
    vec![
        MenuEntry { action: Action::Search, label: labels.menu_search },
        MenuEntry { action: Action::SwitchLanguage, label: labels.menu_language },
        MenuEntry { action: Action::ToggleTheme, label: labels.menu_theme },
        MenuEntry { action: Action::Quit, label: labels.menu_quit },
    ]
}

pub async fn run(orchestrator: AcquisitionOrchestrator, options: RenderOptions) -> anyhow::Result<()> {
    let (handle, service) = OrchestratorService::spawn(orchestrator);
    handle.start().await?;

    loop {
        let published = handle.wait_idle().await?;
        println!();
        print!("{}", render(&published, &options));

        let labels = Labels::for_language(published.snapshot.language);
        let Some(action) = choose(&published, labels).await? else {
            break;
        };
        debug!(?action, "menu selection");

        match action {
            Action::Search => {
                if let Some(term) = ask_city(labels).await? {
                    handle.search(term).await?;
                }
            }
            Action::SwitchLanguage => handle.toggle_language().await?,
            Action::ToggleTheme => handle.toggle_theme().await?,
            Action::Quit => break,
        }
    }

    drop(handle);
    service.await?;
    Ok(())
}

/// `None` when the prompt was cancelled.
async fn choose(published: &Published, labels: &'static Labels) -> anyhow::Result<Option<Action>> {
    let entries = menu(labels);
    let title = published
        .snapshot
        .current
        .as_ref()
        .map(|c| format!("{}, {}", c.name, c.country))
        .unwrap_or_else(|| "weathervane".to_string());

    let picked = task::spawn_blocking(move || Select::new(&title, entries).prompt_skippable()).await?;
    Ok(cancelled_as_none(picked)?.map(|entry| entry.action))
}

async fn ask_city(labels: &'static Labels) -> anyhow::Result<Option<String>> {
    let answer = task::spawn_blocking(move || Text::new(labels.search_prompt).prompt_skippable()).await?;
    Ok(cancelled_as_none(answer)?)
}

fn cancelled_as_none<T>(answer: Result<Option<T>, InquireError>) -> Result<Option<T>, InquireError> {
    match answer {
        Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => Ok(None),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathervane_core::Language;

    #[test]
    fn menu_is_labelled_in_the_current_language() {
        let en: Vec<String> = menu(Labels::for_language(Language::En)).iter().map(ToString::to_string).collect();
        let tr: Vec<String> = menu(Labels::for_language(Language::Tr)).iter().map(ToString::to_string).collect();

        assert_eq!(en, ["Search city", "Türkçe", "Toggle theme", "Quit"]);
        assert_eq!(tr[0], "Şehir ara");
        assert_eq!(tr[1], "English");
    }

    #[test]
    fn interrupt_and_cancel_end_the_prompt_quietly() {
        let interrupted: Result<Option<u8>, _> = Err(InquireError::OperationInterrupted);
        assert!(matches!(cancelled_as_none(interrupted), Ok(None)));

        let canceled: Result<Option<u8>, _> = Err(InquireError::OperationCanceled);
        assert!(matches!(cancelled_as_none(canceled), Ok(None)));

        assert!(matches!(cancelled_as_none(Ok(Some(3u8))), Ok(Some(3))));
    }
}
