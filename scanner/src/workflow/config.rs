use aebcore::prelude::AnalysisConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    #[serde(flatten)]
    pub analysis: AnalysisConfig,
    /// Write the `Scenario` annotation back to disk after the scan.
    pub persist: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            persist: true,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        anyhow::ensure!(
            config.analysis.window_size > 0,
            "workflow config {} sets window_size to 0",
            path_ref.display()
        );
        Ok(config)
    }

    pub fn with_overrides(
        mut self,
        window_size: Option<usize>,
        yaw_threshold: Option<f64>,
    ) -> anyhow::Result<Self> {
        if let Some(window_size) = window_size {
            anyhow::ensure!(window_size > 0, "--window-size must be at least 1");
            self.analysis.window_size = window_size;
        }
        if let Some(threshold) = yaw_threshold {
            self.analysis.yaw_range_threshold_deg = threshold;
        }
        Ok(self)
    }

    pub fn to_analysis_config(&self) -> AnalysisConfig {
        self.analysis.clone()
    }
}
