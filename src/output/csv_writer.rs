use std::io::Write;
use std::path::Path;
use anyhow::{Context, Result};
use crate::evolution::EvolutionMatrix;
use crate::model::CLASS_COUNT;

fn header() -> Vec<String> {
    let mut header = vec!["date".to_string(), "file".to_string()];
    header.extend((1..=CLASS_COUNT).map(|band| format!("Band_{}", band)));
    header
}

/// One line per row: date (empty when unknown), file name, then the seven coverages.
pub fn write_evolution_csv<W: Write>(matrix: &EvolutionMatrix, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header())?;
    for row in matrix.rows() {
        let mut record = vec![
            row.date.as_ref().map(|d| d.to_string()).unwrap_or_default(),
            row.file_name(),
        ];
        record.extend(row.coverage.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_evolution_csv<P: AsRef<Path>>(matrix: &EvolutionMatrix, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).with_context(|| format!("Could not create {}", path.display()))?;
    write_evolution_csv(matrix, file)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use crate::evolution::EvolutionRow;
    use super::*;

    #[test]
    fn test_csv_layout() {
        let matrix = EvolutionMatrix::new(vec![
            EvolutionRow {
                path: PathBuf::from("/data/x_2020-01-01.tif"),
                date: Some("2020-01-01".parse().unwrap()),
                coverage: [50.0, 0.0, 0.0, 0.0, 0.0, 12.5, 0.0],
            },
            EvolutionRow {
                path: PathBuf::from("/data/x.tif"),
                date: None,
                coverage: [0.0; CLASS_COUNT],
            },
        ]);
        let mut buffer = vec![];
        write_evolution_csv(&matrix, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,file,Band_1,Band_2,Band_3,Band_4,Band_5,Band_6,Band_7");
        assert_eq!(lines[1], "2020-01-01,x_2020-01-01.tif,50,0,0,0,0,12.5,0");
        assert_eq!(lines[2], ",x.tif,0,0,0,0,0,0,0");
    }
}
