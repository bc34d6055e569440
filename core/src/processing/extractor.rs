use crate::model::ObjectMotion;
use crate::processing::normalizer::{object_column, DISTANCE_X, DISTANCE_Y, SPEED_X, SPEED_Y};
use crate::table::SampleTable;
use crate::telemetry::log::LogManager;

/// Object labels in column order, taken from the `{id}_ObjectDistance_X` columns.
pub fn object_ids(table: &SampleTable) -> Vec<String> {
    let suffix = format!("_{}", DISTANCE_X);
    table
        .column_names()
        .iter()
        .filter_map(|name| name.strip_suffix(suffix.as_str()))
        .map(str::to_string)
        .collect()
}

/// Column indices of one object's four kinematic columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectColumns {
    pub id: String,
    indices: [usize; 4],
}

/// Every object of a table, resolved once so frames can be read by index.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLayout {
    objects: Vec<ObjectColumns>,
}

impl ObjectLayout {
    /// Objects missing any of their four columns are left out.
    pub fn resolve(table: &SampleTable) -> Self {
        let objects = object_ids(table)
            .into_iter()
            .filter_map(|id| {
                let mut indices = [0; 4];
                for (slot, pattern) in indices
                    .iter_mut()
                    .zip([DISTANCE_X, DISTANCE_Y, SPEED_X, SPEED_Y])
                {
                    *slot = table.column_index(&object_column(&id, pattern))?;
                }
                Some(ObjectColumns { id, indices })
            })
            .collect();
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Builds per-frame object kinematics from a normalized table.
///
/// Only the requested row is ever read.
pub struct ObjectMotionExtractor {
    logger: LogManager,
}

impl ObjectMotionExtractor {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("extractor"),
        }
    }

    /// Objects visible at `timestamp`. Empty when no row matches exactly or
    /// the table has no object columns.
    pub fn extract(&self, table: &SampleTable, timestamp: f64) -> Vec<ObjectMotion> {
        let rows = table.rows_at(timestamp);
        let row = match rows.as_slice() {
            [] => {
                self.logger
                    .detail(&format!("no row at timestamp {}", timestamp));
                return Vec::new();
            }
            [row] => *row,
            [row, ..] => {
                self.logger.anomaly(&format!(
                    "{} rows share timestamp {}, using the first",
                    rows.len(),
                    timestamp
                ));
                *row
            }
        };
        self.extract_row(table, &ObjectLayout::resolve(table), row)
    }

    /// Objects of `layout` at row index `row`.
    pub fn extract_row(
        &self,
        table: &SampleTable,
        layout: &ObjectLayout,
        row: usize,
    ) -> Vec<ObjectMotion> {
        layout
            .objects
            .iter()
            .filter_map(|object| self.motion_at(table, row, object))
            .collect()
    }

    fn motion_at(
        &self,
        table: &SampleTable,
        row: usize,
        object: &ObjectColumns,
    ) -> Option<ObjectMotion> {
        let mut values = [0.0; 4];
        for (slot, &col) in values.iter_mut().zip(&object.indices) {
            *slot = table.value_at(row, col)?;
        }

        if !values.iter().all(|value| value.is_finite()) {
            self.logger.detail(&format!(
                "object {} has non-finite values at row {}",
                object.id, row
            ));
            return None;
        }

        let [x_distance, y_distance, x_speed, y_speed] = values;
        Some(ObjectMotion::from_components(
            object.id.clone(),
            x_distance,
            y_distance,
            x_speed,
            y_speed,
        ))
    }
}

impl Default for ObjectMotionExtractor {
    fn default() -> Self {
        Self::new()
    }
}
