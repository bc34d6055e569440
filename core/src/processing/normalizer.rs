use std::collections::HashMap;

use crate::prelude::{
    AnalysisConfig, AnalysisError, AnalysisResult, TableStage, REQUIRED_COLUMNS, YAW_RATE,
};
use crate::table::SampleTable;
use crate::telemetry::log::LogManager;

pub const DISTANCE_X: &str = "ObjectDistance_X";
pub const DISTANCE_Y: &str = "ObjectDistance_Y";
pub const SPEED_X: &str = "ObjectSpeed_X";
pub const SPEED_Y: &str = "ObjectSpeed_Y";

/// The four per-object sub-patterns, each renumbered on its own.
pub const OBJECT_PATTERNS: [&str; 4] = [DISTANCE_X, DISTANCE_Y, SPEED_X, SPEED_Y];

/// Canonical column name for object `id` and one of [`OBJECT_PATTERNS`].
pub fn object_column(id: &str, pattern: &str) -> String {
    format!("{}_{}", id, pattern)
}

/// Renames recorder-specific object columns to `{n}_ObjectDistance_X` etc.
///
/// Numbering is positional per sub-pattern. The recorder's own prefix (the
/// column name with the sub-pattern removed) must agree across the four
/// columns that end up sharing a number, otherwise the X/Y and distance/speed
/// columns would be silently paired with the wrong object.
///
/// A table with no object columns at all passes through unchanged. A table
/// where only some sub-patterns match (distance columns without speed
/// columns, say) is rejected with
/// [`AnalysisError::InconsistentObjectColumns`] rather than treated as a
/// no-op, since the extractor could not build a single object from it.
pub struct ColumnRenamer {
    logger: LogManager,
}

impl ColumnRenamer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("normalizer"),
        }
    }

    fn rename_mapping(table: &SampleTable) -> AnalysisResult<HashMap<String, String>> {
        let groups: Vec<Vec<(&str, String)>> = OBJECT_PATTERNS
            .iter()
            .map(|pattern| {
                table
                    .column_names()
                    .iter()
                    .filter(|name| name.contains(pattern))
                    .map(|name| (name.as_str(), name.replacen(pattern, "", 1)))
                    .collect()
            })
            .collect();

        let count = groups[0].len();
        if let Some((pattern, group)) = OBJECT_PATTERNS
            .iter()
            .zip(&groups)
            .find(|(_, group)| group.len() != count)
        {
            return Err(AnalysisError::InconsistentObjectColumns {
                index: count.min(group.len()) + 1,
                detail: format!(
                    "{} columns match {} but {} match {}",
                    count,
                    DISTANCE_X,
                    group.len(),
                    pattern
                ),
            });
        }

        let mut mapping = HashMap::new();
        for index in 0..count {
            let source_key = &groups[0][index].1;
            for (pattern, group) in OBJECT_PATTERNS.iter().zip(&groups) {
                let (original, key) = &group[index];
                if key != source_key {
                    return Err(AnalysisError::InconsistentObjectColumns {
                        index: index + 1,
                        detail: format!(
                            "`{}` does not belong with `{}`",
                            original, groups[0][index].0
                        ),
                    });
                }
                mapping.insert(
                    original.to_string(),
                    object_column(&(index + 1).to_string(), pattern),
                );
            }
        }
        Ok(mapping)
    }
}

impl Default for ColumnRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStage for ColumnRenamer {
    fn name(&self) -> &'static str {
        "column-renamer"
    }

    fn apply(&self, mut table: SampleTable) -> AnalysisResult<SampleTable> {
        table.require_columns(&REQUIRED_COLUMNS)?;
        let mapping = Self::rename_mapping(&table)?;
        table.rename_columns(&mapping)?;
        self.logger.record(&format!(
            "renamed {} columns for {} objects",
            mapping.len(),
            mapping.len() / OBJECT_PATTERNS.len()
        ));
        Ok(table)
    }
}

/// Rescales raw sensor units into meters, meters/second and degrees.
pub struct UnitConverter {
    distance_scale: f64,
    speed_scale: f64,
    yaw_scale: f64,
    logger: LogManager,
}

impl UnitConverter {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            distance_scale: config.distance_scale,
            speed_scale: config.speed_scale,
            yaw_scale: config.yaw_scale,
            logger: LogManager::new("normalizer"),
        }
    }
}

impl TableStage for UnitConverter {
    fn name(&self) -> &'static str {
        "unit-converter"
    }

    fn apply(&self, mut table: SampleTable) -> AnalysisResult<SampleTable> {
        table.require_columns(&REQUIRED_COLUMNS)?;

        let distance_scale = self.distance_scale;
        let speed_scale = self.speed_scale;
        let yaw_scale = self.yaw_scale;

        let distances = table.map_columns(
            |name| name.contains("ObjectDistance"),
            |value| value / distance_scale,
        );
        // VehicleSpeed matches too.
        let speeds = table.map_columns(|name| name.contains("Speed"), |value| value / speed_scale);
        table.map_columns(|name| name == YAW_RATE, |value| value * yaw_scale);

        self.logger.record(&format!(
            "converted {} distance and {} speed columns to SI",
            distances.len(),
            speeds.len()
        ));
        Ok(table)
    }
}

/// Renaming followed by unit conversion.
pub struct Normalizer {
    stages: Vec<Box<dyn TableStage>>,
    logger: LogManager,
}

impl Normalizer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            stages: vec![
                Box::new(ColumnRenamer::new()),
                Box::new(UnitConverter::new(config)),
            ],
            logger: LogManager::new("normalizer"),
        }
    }

    pub fn normalize(&self, table: SampleTable) -> AnalysisResult<SampleTable> {
        self.stages.iter().try_fold(table, |table, stage| {
            self.logger.detail(&format!("running {}", stage.name()));
            stage.apply(table)
        })
    }
}
