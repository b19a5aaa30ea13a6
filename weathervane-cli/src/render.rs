//! Terminal rendering of a published orchestrator state.
//!
//! Everything here is a pure function of [`Published`] and [`RenderOptions`];
//! deciding whether to colour and which timezone to show is done by the caller.

use std::io::IsTerminal;

use chrono::{DateTime, Datelike, FixedOffset, Local, Utc};
use weathervane_core::{
    ConditionCategory, CurrentConditions, DailySample, Palette, Published,
    sampler::round_half_up,
    theme::Rgb,
};

use crate::labels::Labels;

/// Humidity above this is labelled "high".
const HUMID_ABOVE_PCT: u8 = 50;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit 24-bit ANSI colour sequences.
    pub color: bool,
    /// Offset used for sunrise and sunset.
    pub offset: FixedOffset,
}

impl RenderOptions {
    pub fn for_stdout() -> Self {
        Self {
            color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
            offset: *Local::now().offset(),
        }
    }
}

struct Painter {
    palette: Palette,
    color: bool,
}

impl Painter {
    fn paint(&self, rgb: Rgb, text: impl AsRef<str>) -> String {
        let text = text.as_ref();
        if !self.color {
            return text.to_string();
        }
        let Rgb(r, g, b) = rgb;
        format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
    }

    fn text(&self, text: impl AsRef<str>) -> String {
        self.paint(self.palette.text, text)
    }

    fn subtext(&self, text: impl AsRef<str>) -> String {
        self.paint(self.palette.subtext, text)
    }

    fn accent(&self, text: impl AsRef<str>) -> String {
        self.paint(self.palette.accent, text)
    }
}

pub fn glyph(condition: &ConditionCategory) -> &'static str {
    match condition {
        ConditionCategory::Clear => "☀",
        ConditionCategory::Clouds => "☁",
        ConditionCategory::Rain => "🌧",
        ConditionCategory::Drizzle => "🌦",
        ConditionCategory::Thunderstorm => "⛈",
        ConditionCategory::Snow => "❄",
        ConditionCategory::Mist
        | ConditionCategory::Smoke
        | ConditionCategory::Haze
        | ConditionCategory::Fog => "🌫",
        ConditionCategory::Other(_) => "☁",
    }
}

pub fn render(published: &Published, options: &RenderOptions) -> String {
    let labels = Labels::for_language(published.snapshot.language);
    let painter = Painter { palette: Palette::for_theme(published.theme), color: options.color };
    let mut lines = Vec::new();

    if let Some(failure) = &published.error {
        lines.push(painter.accent(format!("{}: {failure}", labels.failed)));
    }

    if published.snapshot.loading {
        lines.push(painter.subtext(labels.loading));
    } else if let Some(current) = &published.snapshot.current {
        current_block(&mut lines, current, published, labels, &painter, options.offset);
        forecast_block(&mut lines, published, labels, &painter);
    } else {
        lines.push(painter.subtext(labels.no_data));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn current_block(
    lines: &mut Vec<String>,
    current: &CurrentConditions,
    published: &Published,
    labels: &Labels,
    painter: &Painter,
    offset: FixedOffset,
) {
    let reading = &current.reading;

    lines.push(format!(
        "{}  {}  {}",
        painter.accent(glyph(&reading.condition)),
        painter.text(format!("{}°", round_half_up(reading.temperature))),
        painter.text(format!("{}, {}", current.name, current.country)),
    ));
    lines.push(format!("    {}", painter.subtext(&reading.description)));
    if let Some(suggestion) = published.suggestion {
        lines.push(format!("    {}", painter.accent(labels.suggestion(suggestion))));
    }

    lines.push(String::new());
    lines.push(painter.text(labels.details));
    lines.push(format!(
        "  {}{} m/s  {}",
        painter.subtext(format!("{:<12}", labels.wind)),
        painter.text(reading.wind_speed.to_string()),
        painter.subtext(format!("({}: {:.0}°)", labels.direction, reading.wind_deg)),
    ));
    let level = if reading.humidity_pct > HUMID_ABOVE_PCT { labels.high } else { labels.low };
    lines.push(format!(
        "  {}{} %  {}",
        painter.subtext(format!("{:<12}", labels.humidity)),
        painter.text(reading.humidity_pct.to_string()),
        painter.subtext(format!("({level})")),
    ));
    lines.push(format!(
        "  {}{}°",
        painter.subtext(format!("{:<12}", labels.feels_like)),
        painter.text(round_half_up(reading.feels_like).to_string()),
    ));
    lines.push(format!(
        "  {}{} hPa",
        painter.subtext(format!("{:<12}", labels.pressure)),
        painter.text(reading.pressure_hpa.to_string()),
    ));
    lines.push(format!(
        "  {}{}   {} {}",
        painter.subtext(format!("{:<12}", labels.sunrise)),
        painter.text(clock(current.sunrise, offset)),
        painter.subtext(labels.sunset),
        painter.text(clock(current.sunset, offset)),
    ));
}

fn forecast_block(lines: &mut Vec<String>, published: &Published, labels: &Labels, painter: &Painter) {
    let daily: &[DailySample] = &published.snapshot.daily;
    if daily.is_empty() && published.forecast_available {
        return;
    }

    lines.push(String::new());
    lines.push(painter.text(labels.forecast));
    if !published.forecast_available {
        lines.push(format!("  {}", painter.subtext(labels.no_forecast)));
    }
    for day in daily {
        lines.push(format!(
            "  {}  {}  {}",
            painter.text(labels.weekday(day.date.weekday())),
            painter.accent(glyph(&day.condition)),
            painter.text(format!("{}°", day.temperature)),
        ));
    }
}

fn clock(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%H:%M").to_string()
}
