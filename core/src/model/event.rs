use std::fmt;

use serde::{Deserialize, Serialize};

use super::motion::ObjectMotion;

pub const NO_EVENT_LABEL: &str = "no event";

/// Pre-crash maneuver classes used for AEB validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioLabel {
    /// Yaw-dominated: ego turning across the object's path.
    #[serde(rename = "CPTA")]
    Cpta,
    /// Lateral-dominated: object crossing ego's path.
    #[serde(rename = "CPNCO")]
    Cpnco,
    /// Longitudinal-dominated: straight-line closing approach.
    #[serde(rename = "CPLA")]
    Cpla,
}

impl ScenarioLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpta => "CPTA",
            Self::Cpnco => "CPNCO",
            Self::Cpla => "CPLA",
        }
    }
}

impl fmt::Display for ScenarioLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most safety-critical interaction found in a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalInteraction {
    pub object: ObjectMotion,
    pub scenario: ScenarioLabel,
    pub timestamp: f64,
    /// Index of the event row in the scanned table.
    pub row: usize,
    pub ttc: f64,
}

/// Final output of a scan. Created once and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Event {
    NotFound,
    Found(CriticalInteraction),
}

impl Event {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn interaction(&self) -> Option<&CriticalInteraction> {
        match self {
            Self::Found(interaction) => Some(interaction),
            Self::NotFound => None,
        }
    }

    pub fn relevant_object(&self) -> Option<&ObjectMotion> {
        self.interaction().map(|interaction| &interaction.object)
    }

    pub fn scenario(&self) -> Option<ScenarioLabel> {
        self.interaction().map(|interaction| interaction.scenario)
    }

    pub fn scenario_label(&self) -> &'static str {
        self.scenario()
            .map(|label| label.as_str())
            .unwrap_or(NO_EVENT_LABEL)
    }

    pub fn scenario_timestamp(&self) -> Option<f64> {
        self.interaction().map(|interaction| interaction.timestamp)
    }

    /// Composite `"{id}_{scenario}"` value written into the `Scenario` column.
    pub fn annotation(&self) -> Option<String> {
        self.interaction()
            .map(|interaction| format!("{}_{}", interaction.object.id, interaction.scenario))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(interaction) => write!(
                f,
                "At {}: object {} got into scenario {}",
                interaction.timestamp, interaction.object.id, interaction.scenario
            ),
            Self::NotFound => f.write_str("No event found"),
        }
    }
}
