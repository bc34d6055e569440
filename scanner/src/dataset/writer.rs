use aebcore::prelude::SCENARIO;
use aebcore::SampleTable;
use anyhow::Context;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the table with a trailing `Scenario` column.
pub fn write_table<P: AsRef<Path>>(path: P, table: &SampleTable) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref)
        .with_context(|| format!("creating annotated recording {}", path_ref.display()))?;
    write_to(file, table).with_context(|| format!("writing {}", path_ref.display()))
}

pub fn write_to<W: Write>(writer: W, table: &SampleTable) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = table.column_names().iter().map(String::as_str).collect();
    header.push(SCENARIO);
    wtr.write_record(&header).context("writing header row")?;

    for (idx, annotation) in table.annotations().iter().enumerate() {
        let mut record: Vec<String> = table
            .row(idx)
            .iter()
            .map(|value| {
                if value.is_nan() {
                    String::new()
                } else {
                    value.to_string()
                }
            })
            .collect();
        record.push(annotation.clone().unwrap_or_default());
        wtr.write_record(&record)
            .with_context(|| format!("writing data row {}", idx + 1))?;
    }

    wtr.flush().context("flushing csv writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::load_table;
    use tempfile::NamedTempFile;

    fn table() -> SampleTable {
        SampleTable::new(
            vec!["Timestamp".into(), "YawRate".into()],
            vec![vec![0.0, 0.5], vec![0.1, f64::NAN], vec![0.2, 0.25]],
        )
        .unwrap()
    }

    #[test]
    fn only_the_annotated_row_carries_a_scenario() {
        let mut table = table();
        table.annotate(0.1, "2_CPNCO").unwrap();

        let mut buffer = Vec::new();
        write_to(&mut buffer, &table).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Timestamp,YawRate,Scenario");
        assert_eq!(lines[1], "0,0.5,");
        assert_eq!(lines[2], "0.1,,2_CPNCO");
        assert_eq!(lines[3], "0.2,0.25,");
    }

    #[test]
    fn written_file_loads_back() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.into_temp_path();
        write_table(&path, &table()).unwrap();

        let loaded = load_table(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.value(2, "YawRate"), Some(0.25));
        assert!(loaded.value(1, "YawRate").unwrap().is_nan());
        assert!(!loaded.has_column("Scenario"));
    }
}
