use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::Serialize;
use crate::evolution::{EvolutionReport, EvolutionRow};

#[derive(Serialize)]
struct FailureEntry<'a> {
    path: &'a Path,
    reason: String,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    series: &'a str,
    rows: &'a [EvolutionRow],
    failures: Vec<FailureEntry<'a>>,
}

pub fn report_to_json(report: &EvolutionReport, series_name: &str) -> Result<String> {
    let document = ReportDocument {
        series: series_name,
        rows: report.matrix.rows(),
        failures: report
            .failures
            .iter()
            .map(|failure| FailureEntry { path: &failure.path, reason: failure.error.to_string() })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn save_report_json<P: AsRef<Path>>(report: &EvolutionReport, series_name: &str, path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    std::fs::write(path, report_to_json(report, series_name)?)
        .with_context(|| format!("Could not write {}", path.display()))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::evolution::{EvolutionMatrix, FileFailure};
    use crate::model::CLASS_COUNT;
    use super::*;

    #[test]
    fn test_report_document() {
        let report = EvolutionReport {
            matrix: EvolutionMatrix::new(vec![EvolutionRow {
                path: PathBuf::from("a_2020-01-01.tif"),
                date: Some("2020-01-01".parse().unwrap()),
                coverage: [1.0; CLASS_COUNT],
            }]),
            failures: vec![FileFailure {
                path: PathBuf::from("b.tif"),
                error: Error::BandNotFound { index: 4, band_count: 3 },
            }],
        };
        let json: serde_json::Value = serde_json::from_str(&report_to_json(&report, "tile").unwrap()).unwrap();
        assert_eq!(json["series"], "tile");
        assert_eq!(json["rows"][0]["date"], "2020-01-01");
        assert_eq!(json["rows"][0]["coverage"].as_array().unwrap().len(), CLASS_COUNT);
        assert_eq!(json["failures"][0]["path"], "b.tif");
        assert_eq!(json["failures"][0]["reason"], "band 4 not found, raster has 3 band(s)");
    }
}
