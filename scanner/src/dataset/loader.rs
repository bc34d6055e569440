use aebcore::prelude::SCENARIO;
use aebcore::SampleTable;
use anyhow::Context;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads a recording from a CSV file with a header row.
pub fn load_table<P: AsRef<Path>>(path: P) -> anyhow::Result<SampleTable> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)
        .with_context(|| format!("opening recording {}", path_ref.display()))?;
    read_table(file).with_context(|| format!("reading recording {}", path_ref.display()))
}

/// Parses CSV into a table. Empty cells become NaN; a previous `Scenario`
/// annotation column is dropped.
pub fn read_table<R: Read>(reader: R) -> anyhow::Result<SampleTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("reading header row")?.clone();
    let keep: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| *name != SCENARIO)
        .map(|(idx, _)| idx)
        .collect();
    let columns: Vec<String> = keep.iter().map(|&idx| headers[idx].to_string()).collect();

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading data row {}", line + 1))?;
        let row = keep
            .iter()
            .map(|&idx| {
                let cell = record.get(idx).unwrap_or("");
                if cell.is_empty() {
                    return Ok(f64::NAN);
                }
                cell.parse::<f64>().with_context(|| {
                    format!(
                        "data row {} column `{}`: `{}` is not numeric",
                        line + 1,
                        &headers[idx],
                        cell
                    )
                })
            })
            .collect::<anyhow::Result<Vec<f64>>>()?;
        rows.push(row);
    }

    SampleTable::new(columns, rows).context("building sample table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_table_maps_empty_cells_to_nan() {
        let csv = "Timestamp,VehicleSpeed,YawRate\n0.0,512,\n0.1,512,0.01\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.value(0, "YawRate").unwrap().is_nan());
        assert_eq!(table.value(1, "VehicleSpeed"), Some(512.0));
    }

    #[test]
    fn read_table_drops_previous_annotations() {
        let csv = "Timestamp,YawRate,Scenario\n0.0,0.0,1_CPLA\n0.1,0.0,\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.column_names(), &["Timestamp".to_string(), "YawRate".to_string()]);
    }

    #[test]
    fn read_table_reports_non_numeric_cells() {
        let csv = "Timestamp,YawRate\n0.0,abc\n";
        let err = read_table(csv.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("`YawRate`"));
    }

    #[test]
    fn read_table_rejects_ragged_rows() {
        let csv = "Timestamp,YawRate\n0.0,0.0\n0.1\n";
        assert!(read_table(csv.as_bytes()).is_err());
    }
}
