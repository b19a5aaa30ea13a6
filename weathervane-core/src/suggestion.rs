use serde::Serialize;

use crate::model::{ConditionCategory, CurrentConditions};

pub const WINDY_ABOVE_MPS: f64 = 10.0;
pub const HOT_ABOVE_C: f64 = 28.0;
pub const COLD_BELOW_C: f64 = 10.0;

/// Contextual recommendation derived from current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suggestion {
    Rain,
    Snow,
    Wind,
    Sunny,
    Cold,
    Good,
}

impl Suggestion {
    /// Translation key used by the presentation layer.
    pub fn key(&self) -> &'static str {
        match self {
            Suggestion::Rain => "suggestRain",
            Suggestion::Snow => "suggestSnow",
            Suggestion::Wind => "suggestWind",
            Suggestion::Sunny => "suggestSunny",
            Suggestion::Cold => "suggestCold",
            Suggestion::Good => "suggestGood",
        }
    }
}

/// First matching rule wins: precipitation, snow, wind, heat, cold, else good.
/// `None` when there are no conditions yet.
pub fn suggest(conditions: Option<&CurrentConditions>) -> Option<Suggestion> {
    let reading = &conditions?.reading;

    let suggestion = match reading.condition {
        ConditionCategory::Rain | ConditionCategory::Drizzle => Suggestion::Rain,
        ConditionCategory::Snow => Suggestion::Snow,
        _ if reading.wind_speed > WINDY_ABOVE_MPS => Suggestion::Wind,
        _ if reading.temperature > HOT_ABOVE_C => Suggestion::Sunny,
        _ if reading.temperature < COLD_BELOW_C => Suggestion::Cold,
        _ => Suggestion::Good,
    };

    Some(suggestion)
}
