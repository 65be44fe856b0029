//! Normalized difference indices from multispectral rasters.

use ndarray::{Array2, ArrayView2, Zip};
use tracing::trace;
use crate::error::{Error, Result};
use crate::raster::RasterSource;

pub const DEFAULT_RED_BAND: usize = 3;
pub const DEFAULT_NIR_BAND: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralIndexParams {
    pub red_band: usize,
    pub nir_band: usize,
    /// Binarise the index: 1 where it exceeds the threshold, else 0.
    pub threshold: Option<f64>,
}

impl Default for SpectralIndexParams {
    fn default() -> Self {
        Self {
            red_band: DEFAULT_RED_BAND,
            nir_band: DEFAULT_NIR_BAND,
            threshold: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpectralOutput {
    Index(Array2<f64>),
    Mask(Array2<u8>),
}

/// `(a - b) / (a + b)` per pixel.
///
/// Every output value is finite and in [-1, 1]:
/// - a denominator of exactly 0 gives 0,
/// - a non-finite quotient (NaN or infinite inputs) gives 0,
/// - negative inputs can push the ratio outside [-1, 1], it is clamped.
pub fn normalized_difference(band_a: ArrayView2<f64>, band_b: ArrayView2<f64>) -> Result<Array2<f64>> {
    let (er, ec) = band_a.dim();
    let (ar, ac) = band_b.dim();
    if (er, ec) != (ar, ac) {
        return Err(Error::SizeMismatch { er, ec, ar, ac });
    }

    let mut degenerate = 0usize;
    let index = Zip::from(&band_a).and(&band_b).map_collect(|&a, &b| {
        let denominator = a + b;
        if denominator == 0.0 {
            degenerate += 1;
            return 0.0;
        }
        let value = (a - b) / denominator;
        if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            degenerate += 1;
            0.0
        }
    });
    if degenerate > 0 {
        trace!(pixels = degenerate, "Degenerate normalized difference pixels set to 0");
    }
    Ok(index)
}

/// Normalized Difference Vegetation Index, `(NIR - Red) / (NIR + Red)`.
///
/// Both band indices are checked against the raster before anything is read.
pub fn ndvi<S: RasterSource + ?Sized>(source: &S, red_band: usize, nir_band: usize) -> Result<Array2<f64>> {
    check_band_index(source, red_band)?;
    check_band_index(source, nir_band)?;
    let red = source.read_band(red_band)?;
    let nir = source.read_band(nir_band)?;
    normalized_difference(nir.view(), red.view())
}

pub fn threshold_mask(index: ArrayView2<f64>, threshold: f64) -> Array2<u8> {
    index.mapv(|v| if v > threshold { 1 } else { 0 })
}

pub fn compute_spectral_index<S: RasterSource + ?Sized>(source: &S, params: &SpectralIndexParams) -> Result<SpectralOutput> {
    let index = ndvi(source, params.red_band, params.nir_band)?;
    Ok(match params.threshold {
        Some(threshold) => SpectralOutput::Mask(threshold_mask(index.view(), threshold)),
        None => SpectralOutput::Index(index),
    })
}

pub(crate) fn check_band_index<S: RasterSource + ?Sized>(source: &S, index: usize) -> Result<()> {
    let available = source.band_count();
    if index == 0 {
        return Err(Error::BandNotFound { index, band_count: available });
    }
    if index > available {
        return Err(Error::InsufficientBands { required: index, available });
    }
    Ok(())
}
