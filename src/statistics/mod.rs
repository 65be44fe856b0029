mod coverage;
mod histogram;

pub use coverage::coverage_percentage;
pub use histogram::{band_histogram, rgb_histograms, BandHistogram, LabeledHistogram, DEFAULT_BINS, INFRARED_BAND, RGB_RANGE};
