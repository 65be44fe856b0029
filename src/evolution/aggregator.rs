use std::path::{Path, PathBuf};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use crate::error::Result;
use crate::evolution::matrix::{EvolutionMatrix, EvolutionReport, EvolutionRow, FileFailure};
use crate::model::{DateLabel, LandCoverClass, CLASS_COUNT};
use crate::raster::{RasterOpener, RasterSource};
use crate::statistics::coverage_percentage;

/// What a batch does when one raster cannot be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure in the report and continue with the next file.
    #[default]
    SkipAndReport,
    /// Stop at the first failing file (in path order) and return its error.
    Abort,
}

/// Builds an [`EvolutionMatrix`] from a series of class rasters.
pub struct EvolutionAggregator<O: RasterOpener> {
    opener: O,
    failure_policy: FailurePolicy,
    parallel: bool,
}

impl<O: RasterOpener + Sync> EvolutionAggregator<O> {
    pub fn new(opener: O) -> Self {
        EvolutionAggregator {
            opener,
            failure_policy: FailurePolicy::default(),
            parallel: false,
        }
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Coverage of bands 1..=7 of one raster. The raster is closed on return.
    pub fn process_file(&self, path: &Path) -> Result<EvolutionRow> {
        let source = self.opener.open(path)?;
        let mut coverage = [0.0; CLASS_COUNT];
        for class in LandCoverClass::ALL {
            let band = source.read_band(class.band())?;
            coverage[class.band() - 1] = coverage_percentage(band.view());
        }

        let date = DateLabel::from_path(path);
        if date.is_none() {
            warn!(path = %path.display(), "Unknown date format in file name");
        }
        debug!(path = %path.display(), ?coverage, "Processed raster");
        Ok(EvolutionRow { path: path.to_path_buf(), date, coverage })
    }

    /// Processes the rasters in ascending path order.
    ///
    /// Every file is either a row of the matrix or an entry of the report's failures,
    /// unless the policy is [`FailurePolicy::Abort`].
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> Result<EvolutionReport> {
        let mut paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        paths.sort();
        info!(files = paths.len(), parallel = self.parallel, "Computing class evolution");

        let results: Box<dyn Iterator<Item = Result<EvolutionRow>> + '_> = if self.parallel {
            let collected: Vec<Result<EvolutionRow>> =
                paths.par_iter().map(|path| self.process_file(path)).collect();
            Box::new(collected.into_iter())
        } else {
            Box::new(paths.iter().map(|path| self.process_file(path)))
        };

        let mut rows = vec![];
        let mut failures = vec![];
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(row) => rows.push(row),
                Err(error) => match self.failure_policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::SkipAndReport => {
                        warn!(path = %path.display(), %error, "Skipping raster");
                        failures.push(FileFailure { path: path.clone(), error });
                    }
                },
            }
        }

        info!(rows = rows.len(), failures = failures.len(), "Class evolution computed");
        Ok(EvolutionReport { matrix: EvolutionMatrix::new(rows), failures })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use crate::error::Error;
    use crate::raster::{MemoryOpener, MemoryRaster};
    use super::*;

    /// Seven 10x10 bands, uniform 5 except the empty one.
    fn class_raster(empty_band: usize) -> MemoryRaster {
        let bands = (1..=CLASS_COUNT)
            .map(|band| if band == empty_band { Array2::zeros((10, 10)) } else { Array2::from_elem((10, 10), 5.0) })
            .collect();
        MemoryRaster::new(bands).unwrap()
    }

    fn three_band_raster() -> MemoryRaster {
        MemoryRaster::new(vec![Array2::from_elem((4, 4), 1.0); 3]).unwrap()
    }

    #[test]
    fn test_uniform_bands_and_empty_band() {
        let aggregator = EvolutionAggregator::new(
            MemoryOpener::new().with_raster("scene_2020-05-12_v1.tif", class_raster(3)),
        );
        let row = aggregator.process_file(Path::new("scene_2020-05-12_v1.tif")).unwrap();
        assert_eq!(row.date.as_ref().unwrap().as_str(), "2020-05-12");
        for (column, value) in row.coverage.iter().enumerate() {
            if column == 2 {
                assert_eq!(*value, 0.0);
            } else {
                assert_relative_eq!(*value, 100.0);
            }
        }
    }

    #[test]
    fn test_rows_sorted_by_path_with_dates_attached() {
        let opener = MemoryOpener::new()
            .with_raster("mask_2021-06-01.tif", class_raster(1))
            .with_raster("mask_2019-06-01.tif", class_raster(2))
            .with_raster("mask_undated.tif", class_raster(4));
        let aggregator = EvolutionAggregator::new(opener);
        let report = aggregator
            .run(&["mask_undated.tif", "mask_2021-06-01.tif", "mask_2019-06-01.tif"])
            .unwrap();

        assert!(report.is_complete());
        let matrix = &report.matrix;
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.to_array().ncols(), CLASS_COUNT);
        let names: Vec<String> = matrix.rows().iter().map(|row| row.file_name()).collect();
        assert_eq!(names, vec!["mask_2019-06-01.tif", "mask_2021-06-01.tif", "mask_undated.tif"]);
        let dates: Vec<Option<String>> = matrix.dates().iter().map(|d| d.map(|d| d.to_string())).collect();
        assert_eq!(dates, vec![Some("2019-06-01".to_string()), Some("2021-06-01".to_string()), None]);
        assert_eq!(matrix.rows()[0].coverage[1], 0.0);
        assert_eq!(matrix.rows()[2].coverage[3], 0.0);
    }

    #[test]
    fn test_failures_are_reported_and_skipped() {
        let opener = MemoryOpener::new()
            .with_raster("a_2020-01-01.tif", class_raster(1))
            .with_raster("b_2020-02-01.tif", three_band_raster())
            .with_raster("d_2020-04-01.tif", class_raster(2));
        let aggregator = EvolutionAggregator::new(opener);
        let report = aggregator
            .run(&["a_2020-01-01.tif", "b_2020-02-01.tif", "c_2020-03-01.tif", "d_2020-04-01.tif"])
            .unwrap();

        assert_eq!(report.matrix.len(), 2);
        assert_eq!(report.processed(), 4);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].path, PathBuf::from("b_2020-02-01.tif"));
        assert!(matches!(report.failures[0].error, Error::BandNotFound { index: 4, band_count: 3 }));
        assert_eq!(report.failures[1].path, PathBuf::from("c_2020-03-01.tif"));
        assert!(matches!(report.failures[1].error, Error::RasterOpen { .. }));
        let dates: Vec<String> = report.matrix.dated_rows().map(|(date, _)| date.to_string()).collect();
        assert_eq!(dates, vec!["2020-01-01", "2020-04-01"]);
    }

    #[test]
    fn test_abort_policy() {
        let opener = MemoryOpener::new()
            .with_raster("a.tif", class_raster(1))
            .with_raster("b.tif", three_band_raster());
        let aggregator = EvolutionAggregator::new(opener).with_failure_policy(FailurePolicy::Abort);
        let result = aggregator.run(&["a.tif", "b.tif"]);
        assert!(matches!(result, Err(Error::BandNotFound { index: 4, band_count: 3 })));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut opener = MemoryOpener::new();
        let mut paths = vec![];
        for i in 0..12 {
            let path = format!("series_2020-{:02}-01.tif", i % 12 + 1);
            opener = opener.with_raster(path.clone(), class_raster(i % CLASS_COUNT + 1));
            paths.push(path);
        }
        paths.push("missing.tif".to_string());

        let sequential = EvolutionAggregator::new(opener.clone()).run(paths.as_slice()).unwrap();
        let parallel = EvolutionAggregator::new(opener).with_parallel(true).run(paths.as_slice()).unwrap();
        assert_eq!(sequential.matrix, parallel.matrix);
        assert_eq!(parallel.failures.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let report = EvolutionAggregator::new(MemoryOpener::new()).run::<&str>(&[]).unwrap();
        assert!(report.matrix.is_empty());
        assert!(report.is_complete());
    }
}
