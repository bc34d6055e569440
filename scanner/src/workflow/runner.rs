use crate::workflow::config::WorkflowConfig;
use aebcore::processing::{object_ids, EventSelector, Normalizer};
use aebcore::telemetry::ScanMetrics;
use aebcore::{Event, SampleTable};
use anyhow::Context;

#[derive(Debug)]
pub struct WorkflowResult {
    /// Recording as loaded, in recorder units, annotated at the event row when
    /// one was found. This is what gets persisted.
    pub recording: SampleTable,
    /// Renamed and unit-converted copy the scan ran on.
    pub normalized: SampleTable,
    pub event: Event,
    pub metrics: ScanMetrics,
    pub object_count: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, raw: SampleTable) -> anyhow::Result<WorkflowResult> {
        let analysis = self.config.to_analysis_config();

        let mut recording = raw.clone();
        let normalized = Normalizer::new(&analysis)
            .normalize(raw)
            .context("normalizing recording")?;
        let object_count = object_ids(&normalized).len();

        let report = EventSelector::new(&analysis)
            .select(&normalized)
            .context("selecting critical event")?;

        // Normalizing keeps rows in place, so the event row indexes both tables.
        if let (Some(interaction), Some(annotation)) =
            (report.event.interaction(), report.event.annotation())
        {
            recording
                .annotate_row(interaction.row, annotation)
                .context("annotating event row")?;
        }

        Ok(WorkflowResult {
            recording,
            normalized,
            event: report.event,
            metrics: report.metrics,
            object_count,
        })
    }
}
