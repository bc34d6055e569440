pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod selector;
pub mod ttc;

pub use classifier::{ClassifierConfig, ScenarioClassifier, WindowExtent};
pub use extractor::{object_ids, ObjectLayout, ObjectMotionExtractor};
pub use normalizer::{ColumnRenamer, Normalizer, UnitConverter};
pub use selector::{EventSelector, ScanReport};
pub use ttc::TtcEvaluator;
