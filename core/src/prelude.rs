use serde::{Deserialize, Serialize};

use crate::table::SampleTable;

pub const TIMESTAMP: &str = "Timestamp";
pub const VEHICLE_SPEED: &str = "VehicleSpeed";
pub const YAW_RATE: &str = "YawRate";
pub const SCENARIO: &str = "Scenario";

/// Ego columns every recording must carry before any computation starts.
pub const REQUIRED_COLUMNS: [&str; 3] = [TIMESTAMP, VEHICLE_SPEED, YAW_RATE];

/// Shared configuration for the normalization, selection and classification stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Trailing rows inspected by the scenario classifier.
    pub window_size: usize,
    /// Yaw-rate span (degrees) above which a window is yaw-dominated.
    pub yaw_range_threshold_deg: f64,
    /// Raw sensor units per meter.
    pub distance_scale: f64,
    /// Raw sensor units per meter/second.
    pub speed_scale: f64,
    /// Multiplier applied to the yaw-rate column (radians to degrees).
    pub yaw_scale: f64,
    /// Floor for the TTC denominator.
    pub ttc_epsilon: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 60,
            yaw_range_threshold_deg: 15.0,
            distance_scale: 128.0,
            speed_scale: 256.0,
            yaw_scale: 180.0 / std::f64::consts::PI,
            ttc_epsilon: 1e-10,
        }
    }
}

/// Common error type for every stage of the analysis.
///
/// Only schema-level problems are represented here; per-row anomalies are
/// absorbed by the stages themselves.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("missing required column `{0}`")]
    MissingColumn(String),
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("inconsistent object columns for object {index}: {detail}")]
    InconsistentObjectColumns { index: usize, detail: String },
    #[error("timestamp at row {row} ({value}) does not follow its predecessor")]
    NonMonotonicTimestamp { row: usize, value: f64 },
    #[error("row {0} is past the end of the table")]
    RowOutOfRange(usize),
    #[error("no row with timestamp {0}")]
    TimestampNotFound(f64),
    #[error("classification window is empty")]
    EmptyWindow,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// A whole-table transformation that can be chained with other stages.
pub trait TableStage {
    fn name(&self) -> &'static str;
    fn apply(&self, table: SampleTable) -> AnalysisResult<SampleTable>;
}
