use serde::{Deserialize, Serialize};

use crate::model::{CriticalInteraction, Event, ObjectMotion};
use crate::prelude::{AnalysisConfig, AnalysisResult, REQUIRED_COLUMNS};
use crate::processing::classifier::{ClassifierConfig, ScenarioClassifier};
use crate::processing::extractor::{ObjectLayout, ObjectMotionExtractor};
use crate::processing::ttc::TtcEvaluator;
use crate::table::SampleTable;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::ScanMetrics;

/// Result of scanning a whole recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub event: Event,
    pub metrics: ScanMetrics,
}

#[derive(Default)]
struct ScanState {
    best: Option<CriticalInteraction>,
    metrics: ScanMetrics,
}

/// Finds the lowest-TTC interaction of a recording.
///
/// Rows are visited in table order once the timestamps are known to be
/// strictly increasing, so row order is time order. Each frame only sees its
/// own row, and classification at a row only sees the trailing window ending
/// at that row.
pub struct EventSelector {
    extractor: ObjectMotionExtractor,
    evaluator: TtcEvaluator,
    classifier: ScenarioClassifier,
    logger: LogManager,
}

impl EventSelector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            extractor: ObjectMotionExtractor::new(),
            evaluator: TtcEvaluator::new(config.ttc_epsilon),
            classifier: ScenarioClassifier::new(ClassifierConfig::from(config)),
            logger: LogManager::new("selector"),
        }
    }

    pub fn select(&self, table: &SampleTable) -> AnalysisResult<ScanReport> {
        table.require_columns(&REQUIRED_COLUMNS)?;
        table.ensure_chronological()?;

        let layout = ObjectLayout::resolve(table);
        let state = table
            .timestamps()?
            .iter()
            .enumerate()
            .try_fold(ScanState::default(), |state, (row, &timestamp)| {
                self.step(table, &layout, state, row, timestamp)
            })?;

        let event = match state.best {
            Some(interaction) => Event::Found(interaction),
            None => Event::NotFound,
        };
        self.logger.record(&format!(
            "scanned {} frames, {} candidates, {} minimum updates: {}",
            state.metrics.frames_scanned,
            state.metrics.candidates_evaluated,
            state.metrics.minimum_updates,
            event
        ));

        Ok(ScanReport {
            event,
            metrics: state.metrics,
        })
    }

    fn step(
        &self,
        table: &SampleTable,
        layout: &ObjectLayout,
        state: ScanState,
        row: usize,
        timestamp: f64,
    ) -> AnalysisResult<ScanState> {
        let mut metrics = state.metrics.record_frame();
        let mut frame_best: Option<(ObjectMotion, f64)> = None;

        for object in self.extractor.extract_row(table, layout, row) {
            if !object.is_moving() {
                metrics = metrics.record_stationary();
                continue;
            }
            metrics = metrics.record_candidate();
            let ttc = self.evaluator.ttc(&object);
            if frame_best.as_ref().map_or(true, |(_, best)| ttc < *best) {
                frame_best = Some((object, ttc));
            }
        }

        let improves = match (&frame_best, &state.best) {
            (Some((_, ttc)), Some(current)) => *ttc < current.ttc,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let (object, ttc) = match frame_best {
            Some(candidate) if improves => candidate,
            _ => {
                return Ok(ScanState {
                    best: state.best,
                    metrics,
                })
            }
        };

        let scenario = self.classifier.classify_at(table, row, &object.id)?;
        self.logger.detail(&format!(
            "new minimum ttc {:.4}s for object {} at {} ({})",
            ttc, object.id, timestamp, scenario
        ));

        Ok(ScanState {
            best: Some(CriticalInteraction {
                object,
                scenario,
                timestamp,
                row,
                ttc,
            }),
            metrics: metrics.record_minimum(),
        })
    }
}

impl Default for EventSelector {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScenarioLabel;
    use crate::prelude::AnalysisError;

    const HEADER: [&str; 7] = [
        "Timestamp",
        "VehicleSpeed",
        "YawRate",
        "1_ObjectDistance_X",
        "1_ObjectDistance_Y",
        "1_ObjectSpeed_X",
        "1_ObjectSpeed_Y",
    ];

    fn table(header: &[&str], rows: Vec<Vec<f64>>) -> SampleTable {
        SampleTable::new(header.iter().map(|c| c.to_string()).collect(), rows).unwrap()
    }

    /// One object closing head-on at 10 m/s from 100 m, sampled every 0.1 s.
    fn head_on(rows: usize) -> SampleTable {
        table(
            &HEADER,
            (0..rows)
                .map(|i| {
                    let t = i as f64 * 0.1;
                    vec![t, 15.0, 0.0, 100.0 - 10.0 * t, 0.0, -10.0, 0.0]
                })
                .collect(),
        )
    }

    #[test]
    fn head_on_approach_is_longitudinal() {
        let table = head_on(100);
        let report = EventSelector::default().select(&table).unwrap();

        let interaction = report.event.interaction().unwrap();
        assert_eq!(interaction.object.id, "1");
        assert_eq!(interaction.scenario, ScenarioLabel::Cpla);
        assert_eq!(Some(interaction.timestamp), table.value(99, "Timestamp"));
        approx::assert_relative_eq!(interaction.ttc, 0.1, epsilon = 1e-9);
        assert_eq!(report.metrics.frames_scanned, 100);
        assert_eq!(report.metrics.minimum_updates, 100);
    }

    #[test]
    fn stationary_objects_never_become_the_event() {
        let header = [
            "Timestamp",
            "VehicleSpeed",
            "YawRate",
            "1_ObjectDistance_X",
            "1_ObjectDistance_Y",
            "2_ObjectDistance_X",
            "2_ObjectDistance_Y",
            "1_ObjectSpeed_X",
            "1_ObjectSpeed_Y",
            "2_ObjectSpeed_X",
            "2_ObjectSpeed_Y",
        ];
        let rows = vec![
            vec![0.0, 10.0, 0.0, 0.5, 0.0, 80.0, 0.0, 0.0, 0.0, -5.0, 0.0],
            vec![0.1, 10.0, 0.0, 0.5, 0.0, 79.5, 0.0, 0.0, 0.0, -5.0, 0.0],
        ];
        let report = EventSelector::default().select(&table(&header, rows)).unwrap();
        assert_eq!(report.event.relevant_object().unwrap().id, "2");
        assert_eq!(report.metrics.stationary_skipped, 2);
    }

    #[test]
    fn no_moving_object_yields_not_found() {
        let rows = vec![
            vec![0.0, 10.0, 0.0, 30.0, 0.0, 0.0, 0.0],
            vec![0.1, 10.0, 0.0, 30.0, 0.0, 0.0, 0.0],
        ];
        let report = EventSelector::default().select(&table(&HEADER, rows)).unwrap();
        assert_eq!(report.event, Event::NotFound);
        assert_eq!(report.event.scenario_label(), "no event");
        assert_eq!(report.event.scenario_timestamp(), None);
    }

    #[test]
    fn table_without_objects_yields_not_found() {
        let table = table(
            &["Timestamp", "VehicleSpeed", "YawRate"],
            vec![vec![0.0, 1.0, 0.0], vec![0.1, 1.0, 0.0]],
        );
        let report = EventSelector::default().select(&table).unwrap();
        assert!(!report.event.is_found());
        assert_eq!(report.metrics.candidates_evaluated, 0);
    }

    #[test]
    fn missing_schema_fails_before_scanning() {
        let table = table(&["Timestamp", "YawRate"], vec![vec![0.0, 0.0]]);
        assert_eq!(
            EventSelector::default().select(&table).unwrap_err(),
            AnalysisError::MissingColumn("VehicleSpeed".into())
        );
    }

    #[test]
    fn unordered_timestamps_are_rejected() {
        let rows = vec![
            vec![0.2, 10.0, 0.0, 30.0, 0.0, -1.0, 0.0],
            vec![0.1, 10.0, 0.0, 29.0, 0.0, -1.0, 0.0],
        ];
        assert!(matches!(
            EventSelector::default().select(&table(&HEADER, rows)).unwrap_err(),
            AnalysisError::NonMonotonicTimestamp { row: 1, .. }
        ));
    }

    #[test]
    fn earliest_frame_wins_a_tie() {
        let rows = vec![
            vec![0.0, 10.0, 0.0, 20.0, 0.0, -10.0, 0.0],
            vec![0.1, 10.0, 0.0, 20.0, 0.0, -10.0, 0.0],
        ];
        let report = EventSelector::default().select(&table(&HEADER, rows)).unwrap();
        assert_eq!(report.event.scenario_timestamp(), Some(0.0));
    }

    #[test]
    fn later_rows_do_not_change_an_earlier_classification() {
        // Object 1 is closest at t=1.0, then ego swings its yaw hard.
        let rows: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let t = i as f64 * 0.1;
                let (distance, yaw) = if i <= 10 {
                    (40.0 - 30.0 * t, 0.0)
                } else {
                    (40.0, 45.0 * (i - 10) as f64)
                };
                vec![t, 10.0, yaw, distance, 0.0, -20.0, 0.0]
            })
            .collect();
        let full = table(&HEADER, rows);
        let prefix = full.until(1.0);

        let selector = EventSelector::default();
        let from_full = selector.select(&full).unwrap();
        let from_prefix = selector.select(&prefix).unwrap();

        assert_eq!(from_full.event, from_prefix.event);
        assert_eq!(from_full.event.scenario(), Some(ScenarioLabel::Cpla));
        assert_eq!(from_full.event.scenario_timestamp(), full.value(10, "Timestamp"));
        assert_eq!(from_full.event.interaction().map(|i| i.row), Some(10));
    }
}
