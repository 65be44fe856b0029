pub mod indices;
pub mod stretch;

pub use indices::{
    compute_spectral_index, ndvi, normalized_difference, threshold_mask, SpectralIndexParams,
    SpectralOutput, DEFAULT_NIR_BAND, DEFAULT_RED_BAND,
};
pub use stretch::{min_max_stretch, rgb_composite, DEFAULT_RGB_BANDS};
