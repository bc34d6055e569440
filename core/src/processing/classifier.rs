use crate::math::stats::StatsHelper;
use crate::model::ScenarioLabel;
use crate::prelude::{AnalysisConfig, AnalysisError, AnalysisResult, VEHICLE_SPEED, YAW_RATE};
use crate::processing::normalizer::{object_column, DISTANCE_X, DISTANCE_Y};
use crate::table::SampleTable;
use crate::telemetry::log::LogManager;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    pub window_size: usize,
    pub yaw_range_threshold_deg: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for ClassifierConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            window_size: config.window_size,
            yaw_range_threshold_deg: config.yaw_range_threshold_deg,
        }
    }
}

/// Max-minus-min spans over a classification window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowExtent {
    pub yaw_range: f64,
    pub x_range: f64,
    pub y_range: f64,
}

type Rule = fn(&WindowExtent, &ClassifierConfig) -> bool;

fn yaw_dominated(extent: &WindowExtent, config: &ClassifierConfig) -> bool {
    extent.yaw_range > config.yaw_range_threshold_deg
}

fn lateral_dominated(extent: &WindowExtent, _: &ClassifierConfig) -> bool {
    extent.y_range > extent.x_range
}

fn always(_: &WindowExtent, _: &ClassifierConfig) -> bool {
    true
}

/// Evaluated top to bottom; the first matching rule wins and the last one
/// always matches.
const PRIORITY: [(Rule, ScenarioLabel); 3] = [
    (yaw_dominated, ScenarioLabel::Cpta),
    (lateral_dominated, ScenarioLabel::Cpnco),
    (always, ScenarioLabel::Cpla),
];

/// Labels the maneuver leading up to an event from a trailing window of rows.
pub struct ScenarioClassifier {
    config: ClassifierConfig,
    logger: LogManager,
}

impl ScenarioClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("classifier"),
        }
    }

    /// Classifies `object_id` over the last `window_size` rows of `causal`.
    ///
    /// `causal` must already be bounded to rows at or before the event
    /// timestamp; nothing here looks at its timestamps.
    pub fn classify(&self, causal: &SampleTable, object_id: &str) -> AnalysisResult<ScenarioLabel> {
        match causal.len().checked_sub(1) {
            Some(end_row) => self.classify_at(causal, end_row, object_id),
            None => Err(AnalysisError::EmptyWindow),
        }
    }

    /// Classifies `object_id` over the window ending at `end_row` inclusive.
    /// Rows after `end_row` are never read.
    pub fn classify_at(
        &self,
        table: &SampleTable,
        end_row: usize,
        object_id: &str,
    ) -> AnalysisResult<ScenarioLabel> {
        let extent = self.extent_at(table, end_row, object_id)?;
        let label = PRIORITY
            .iter()
            .find(|(rule, _)| rule(&extent, &self.config))
            .map(|(_, label)| *label)
            .unwrap_or(ScenarioLabel::Cpla);
        self.logger.detail(&format!(
            "object {} yaw {:.3} x {:.3} y {:.3} -> {}",
            object_id, extent.yaw_range, extent.x_range, extent.y_range, label
        ));
        Ok(label)
    }

    pub fn extent_at(
        &self,
        table: &SampleTable,
        end_row: usize,
        object_id: &str,
    ) -> AnalysisResult<WindowExtent> {
        let x_column = object_column(object_id, DISTANCE_X);
        let y_column = object_column(object_id, DISTANCE_Y);
        let window = table.window(
            end_row,
            self.config.window_size,
            &[VEHICLE_SPEED, YAW_RATE, x_column.as_str(), y_column.as_str()],
        )?;
        if window.is_empty() {
            return Err(AnalysisError::EmptyWindow);
        }

        let span = |name: &str| {
            window
                .column(name)
                .map(|column| StatsHelper::span(column.iter()))
                .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
        };

        Ok(WindowExtent {
            yaw_range: span(YAW_RATE)?,
            x_range: span(&x_column)?,
            y_range: span(&y_column)?,
        })
    }
}

impl Default for ScenarioClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
