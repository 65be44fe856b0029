use std::path::PathBuf;
use ndarray::{Array1, Array2};
use serde::Serialize;
use crate::error::Error;
use crate::model::{DateLabel, LandCoverClass, CLASS_COUNT};

/// Coverage of every class in one raster of a time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionRow {
    pub path: PathBuf,
    pub date: Option<DateLabel>,
    /// Percentage per class, column `i` holds band `i + 1`.
    pub coverage: [f64; CLASS_COUNT],
}

impl EvolutionRow {
    pub fn class_coverage(&self, class: LandCoverClass) -> f64 {
        self.coverage[class.band() - 1]
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Time-ordered table of class coverage, one row per successfully processed raster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvolutionMatrix {
    rows: Vec<EvolutionRow>,
}

impl EvolutionMatrix {
    pub fn new(rows: Vec<EvolutionRow>) -> Self {
        EvolutionMatrix { rows }
    }

    pub fn rows(&self) -> &[EvolutionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dense `(rows, CLASS_COUNT)` view of the coverage values.
    pub fn to_array(&self) -> Array2<f64> {
        let mut array = Array2::zeros((self.rows.len(), CLASS_COUNT));
        for (mut target, row) in array.rows_mut().into_iter().zip(&self.rows) {
            target.assign(&Array1::from(row.coverage.to_vec()));
        }
        array
    }

    pub fn dates(&self) -> Vec<Option<&DateLabel>> {
        self.rows.iter().map(|row| row.date.as_ref()).collect()
    }

    pub fn class_series(&self, class: LandCoverClass) -> Vec<f64> {
        self.rows.iter().map(|row| row.class_coverage(class)).collect()
    }

    /// Rows with a parsed date, paired with it.
    pub fn dated_rows(&self) -> impl Iterator<Item = (&DateLabel, &EvolutionRow)> {
        self.rows.iter().filter_map(|row| row.date.as_ref().map(|date| (date, row)))
    }
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct EvolutionReport {
    pub matrix: EvolutionMatrix,
    pub failures: Vec<FileFailure>,
}

impl EvolutionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.matrix.len() + self.failures.len()
    }
}
