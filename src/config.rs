use crate::evolution::{EvolutionAggregator, FailurePolicy};
use crate::imagery::{SpectralIndexParams, DEFAULT_RGB_BANDS};
use crate::raster::RasterOpener;
use crate::statistics::DEFAULT_BINS;

/// Tunables shared by the library entry points and the command line.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub failure_policy: FailurePolicy,
    pub parallel: bool,
    pub spectral: SpectralIndexParams,
    pub rgb_bands: (usize, usize, usize),
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            failure_policy: FailurePolicy::SkipAndReport,
            parallel: false,
            spectral: SpectralIndexParams::default(),
            rgb_bands: DEFAULT_RGB_BANDS,
            histogram_bins: DEFAULT_BINS,
        }
    }
}

impl AnalysisConfig {
    pub fn aggregator<O: RasterOpener + Sync>(&self, opener: O) -> EvolutionAggregator<O> {
        EvolutionAggregator::new(opener)
            .with_failure_policy(self.failure_policy)
            .with_parallel(self.parallel)
    }
}
