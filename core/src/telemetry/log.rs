use log::{debug, info, warn};

/// Thin wrapper over the `log` facade that tags messages with their stage.
pub struct LogManager {
    stage: &'static str,
}

impl LogManager {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.stage, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.stage, message);
    }

    pub fn anomaly(&self, message: &str) {
        warn!("[{}] {}", self.stage, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("aebcore")
    }
}
