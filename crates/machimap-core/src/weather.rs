//! The weather side panel. Deliberately static sample data: live forecast
//! integration is out of scope, the UI just needs something to lay out.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyCondition {
    Sunny,
    Cloudy,
    Rain,
}

impl SkyCondition {
    pub fn glyph(&self) -> &'static str {
        match self {
            SkyCondition::Sunny => "☀️",
            SkyCondition::Cloudy => "☁️",
            SkyCondition::Rain => "🌧️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub label: &'static str,
    pub condition: SkyCondition,
    pub high_c: i8,
    pub low_c: i8,
}

/// The fixed three-day sample the panel displays.
pub fn sample_forecast() -> Vec<ForecastEntry> {
    vec![
        ForecastEntry {
            label: "Today",
            condition: SkyCondition::Sunny,
            high_c: 31,
            low_c: 24,
        },
        ForecastEntry {
            label: "Tomorrow",
            condition: SkyCondition::Cloudy,
            high_c: 29,
            low_c: 23,
        },
        ForecastEntry {
            label: "Day after",
            condition: SkyCondition::Rain,
            high_c: 26,
            low_c: 22,
        },
    ]
}
