pub mod event;
pub mod motion;

pub use event::{CriticalInteraction, Event, ScenarioLabel, NO_EVENT_LABEL};
pub use motion::ObjectMotion;
