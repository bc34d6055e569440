use std::collections::{HashMap, HashSet};

use ndarray::{s, Array2, ArrayView1, Axis};

use crate::prelude::{AnalysisError, AnalysisResult, TIMESTAMP};

/// Column-labelled, row-ordered numeric recording.
///
/// Row order is recording order. Values live in a single `rows × columns`
/// array; the string-valued `Scenario` annotation is kept alongside it so the
/// numeric columns stay homogeneous.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    columns: Vec<String>,
    values: Array2<f64>,
    annotations: Vec<Option<String>>,
}

impl SampleTable {
    /// Builds a table from a header and row-major values.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> AnalysisResult<Self> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(AnalysisError::DuplicateColumn(name.clone()));
            }
        }

        let width = columns.len();
        let mut values = Array2::zeros((rows.len(), width));
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(AnalysisError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col_index, &value) in row.iter().enumerate() {
                values[[row_index, col_index]] = value;
            }
        }

        Ok(Self {
            columns,
            annotations: vec![None; values.nrows()],
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.index_of(name).map(|idx| self.values.column(idx))
    }

    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        let col = self.index_of(name)?;
        self.values.get((row, col)).copied()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index_of(name)
    }

    /// Value at a resolved row and column index.
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    pub fn timestamps(&self) -> AnalysisResult<ArrayView1<'_, f64>> {
        self.column(TIMESTAMP)
            .ok_or_else(|| AnalysisError::MissingColumn(TIMESTAMP.to_string()))
    }

    /// Fails on the first name that is not a column of this table.
    pub fn require_columns(&self, names: &[&str]) -> AnalysisResult<()> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(AnalysisError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Timestamps must be strictly increasing and never NaN.
    pub fn ensure_chronological(&self) -> AnalysisResult<()> {
        let timestamps = self.timestamps()?;
        let mut previous: Option<f64> = None;
        for (row, &value) in timestamps.iter().enumerate() {
            let ordered = match previous {
                _ if value.is_nan() => false,
                Some(prev) => value > prev,
                None => true,
            };
            if !ordered {
                return Err(AnalysisError::NonMonotonicTimestamp { row, value });
            }
            previous = Some(value);
        }
        Ok(())
    }

    /// Row indices whose timestamp equals `timestamp` exactly.
    pub fn rows_at(&self, timestamp: f64) -> Vec<usize> {
        match self.column(TIMESTAMP) {
            Some(column) => column
                .iter()
                .enumerate()
                .filter(|&(_, &value)| value == timestamp)
                .map(|(idx, _)| idx)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Causal slice: every row whose timestamp is at or before `timestamp`.
    pub fn until(&self, timestamp: f64) -> SampleTable {
        let indices: Vec<usize> = match self.column(TIMESTAMP) {
            Some(column) => column
                .iter()
                .enumerate()
                .filter(|&(_, &value)| value <= timestamp)
                .map(|(idx, _)| idx)
                .collect(),
            None => Vec::new(),
        };
        self.take_rows(&indices)
    }

    /// Rows `[end_row + 1 - count, end_row]` projected onto `names`.
    ///
    /// Only the requested block is copied; rows after `end_row` are never read.
    pub fn window(
        &self,
        end_row: usize,
        count: usize,
        names: &[&str],
    ) -> AnalysisResult<SampleTable> {
        let indices = self.resolve(names)?;
        if count == 0 || end_row >= self.len() {
            return Ok(Self {
                columns: names.iter().map(|name| name.to_string()).collect(),
                values: Array2::zeros((0, indices.len())),
                annotations: Vec::new(),
            });
        }
        let start = (end_row + 1).saturating_sub(count);
        Ok(Self {
            columns: names.iter().map(|name| name.to_string()).collect(),
            values: self
                .values
                .slice(s![start..=end_row, ..])
                .select(Axis(1), &indices),
            annotations: self.annotations[start..=end_row].to_vec(),
        })
    }

    /// Renames columns; names absent from `mapping` are left untouched.
    pub fn rename_columns(&mut self, mapping: &HashMap<String, String>) -> AnalysisResult<()> {
        let renamed: Vec<String> = self
            .columns
            .iter()
            .map(|name| mapping.get(name).unwrap_or(name).clone())
            .collect();

        let mut seen = HashSet::new();
        for name in &renamed {
            if !seen.insert(name.as_str()) {
                return Err(AnalysisError::DuplicateColumn(name.clone()));
            }
        }

        self.columns = renamed;
        Ok(())
    }

    /// Applies `transform` to every value of the columns accepted by
    /// `predicate` and returns the names of the columns that were touched.
    pub fn map_columns<P, F>(&mut self, predicate: P, transform: F) -> Vec<String>
    where
        P: Fn(&str) -> bool,
        F: Fn(f64) -> f64,
    {
        let mut touched = Vec::new();
        for (idx, name) in self.columns.iter().enumerate() {
            if predicate(name) {
                self.values.column_mut(idx).mapv_inplace(&transform);
                touched.push(name.clone());
            }
        }
        touched
    }

    /// Writes `text` into the `Scenario` annotation of the row at `timestamp`
    /// and clears every other row.
    pub fn annotate(&mut self, timestamp: f64, text: impl Into<String>) -> AnalysisResult<usize> {
        let row = self
            .rows_at(timestamp)
            .first()
            .copied()
            .ok_or(AnalysisError::TimestampNotFound(timestamp))?;
        self.annotate_row(row, text)?;
        Ok(row)
    }

    /// Writes `text` into the `Scenario` annotation of `row` and clears
    /// every other row.
    pub fn annotate_row(&mut self, row: usize, text: impl Into<String>) -> AnalysisResult<()> {
        if row >= self.len() {
            return Err(AnalysisError::RowOutOfRange(row));
        }
        self.annotations.iter_mut().for_each(|slot| *slot = None);
        self.annotations[row] = Some(text.into());
        Ok(())
    }

    pub fn annotations(&self) -> &[Option<String>] {
        &self.annotations
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    fn resolve(&self, names: &[&str]) -> AnalysisResult<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.index_of(name)
                    .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
            })
            .collect()
    }

    fn take_rows(&self, indices: &[usize]) -> SampleTable {
        Self {
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), indices),
            annotations: indices
                .iter()
                .map(|&idx| self.annotations[idx].clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SampleTable {
        SampleTable::new(
            vec!["Timestamp".into(), "YawRate".into(), "VehicleSpeed".into()],
            vec![
                vec![0.0, 0.1, 10.0],
                vec![0.5, 0.2, 11.0],
                vec![1.0, 0.3, 12.0],
                vec![1.5, 0.4, 13.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn table_rejects_ragged_rows() {
        let err = SampleTable::new(
            vec!["Timestamp".into(), "YawRate".into()],
            vec![vec![0.0, 1.0], vec![1.0]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn table_rejects_duplicate_columns() {
        let err = SampleTable::new(vec!["A".into(), "A".into()], vec![]).unwrap_err();
        assert_eq!(err, AnalysisError::DuplicateColumn("A".into()));
    }

    #[test]
    fn until_keeps_rows_at_or_before_boundary() {
        let table = sample();
        let causal = table.until(0.5);
        assert_eq!(causal.len(), 2);
        assert_eq!(causal.value(1, "VehicleSpeed"), Some(11.0));
    }

    #[test]
    fn window_copies_only_the_bounded_block() {
        let table = sample();
        let window = table.window(2, 2, &["YawRate"]).unwrap();
        assert_eq!(window.column_names(), &["YawRate".to_string()]);
        assert_eq!(window.len(), 2);
        assert_eq!(window.value(0, "YawRate"), Some(0.2));
        assert_eq!(window.value(1, "YawRate"), Some(0.3));
        assert_eq!(table.window(1, 60, &["YawRate"]).unwrap().len(), 2);
        assert!(table.window(3, 0, &["YawRate"]).unwrap().is_empty());
    }

    #[test]
    fn annotate_row_rejects_rows_past_the_end() {
        let mut table = sample();
        table.annotate_row(3, "1_CPLA").unwrap();
        assert_eq!(table.annotations()[3].as_deref(), Some("1_CPLA"));
        assert_eq!(
            table.annotate_row(4, "1_CPLA").unwrap_err(),
            AnalysisError::RowOutOfRange(4)
        );
    }

    #[test]
    fn window_reports_missing_column() {
        let err = sample()
            .window(1, 2, &["YawRate", "1_ObjectDistance_X"])
            .unwrap_err();
        assert_eq!(err, AnalysisError::MissingColumn("1_ObjectDistance_X".into()));
    }

    #[test]
    fn chronology_rejects_repeated_timestamp() {
        let table = SampleTable::new(
            vec!["Timestamp".into()],
            vec![vec![0.0], vec![1.0], vec![1.0]],
        )
        .unwrap();
        assert_eq!(
            table.ensure_chronological().unwrap_err(),
            AnalysisError::NonMonotonicTimestamp { row: 2, value: 1.0 }
        );
        assert!(sample().ensure_chronological().is_ok());
    }

    #[test]
    fn annotate_marks_a_single_row() {
        let mut table = sample();
        table.annotate(0.5, "1_CPLA").unwrap();
        table.annotate(1.0, "2_CPTA").unwrap();
        let marked: Vec<_> = table.annotations().iter().flatten().collect();
        assert_eq!(marked, vec!["2_CPTA"]);
        assert_eq!(table.annotations()[2].as_deref(), Some("2_CPTA"));
        assert_eq!(
            table.annotate(7.0, "x").unwrap_err(),
            AnalysisError::TimestampNotFound(7.0)
        );
    }

    #[test]
    fn map_columns_touches_matching_names_only() {
        let mut table = sample();
        let scaled = table.map_columns(|name| name.contains("Speed"), |value| value / 2.0);
        assert_eq!(scaled, vec!["VehicleSpeed".to_string()]);
        assert_eq!(table.value(0, "VehicleSpeed"), Some(5.0));
        assert_eq!(table.value(0, "YawRate"), Some(0.1));
    }
}
