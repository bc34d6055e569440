//! Core analysis for AEB validation recordings.
//!
//! A recording is normalized into canonical columns and SI units, scanned
//! frame by frame for the lowest time-to-collision, and the maneuver leading
//! up to that moment is classified from a causal trailing window.

pub mod math;
pub mod model;
pub mod prelude;
pub mod processing;
pub mod table;
pub mod telemetry;

pub use model::{CriticalInteraction, Event, ObjectMotion, ScenarioLabel};
pub use prelude::{AnalysisConfig, AnalysisError, AnalysisResult, TableStage};
pub use processing::{EventSelector, Normalizer, ScanReport};
pub use table::SampleTable;

