use ndarray::ArrayView2;
use serde::Serialize;
use crate::error::{Error, Result};
use crate::raster::RasterSource;

pub const DEFAULT_BINS: usize = 256;
/// Near-infrared band overlaid by [`rgb_histograms`].
pub const INFRARED_BAND: usize = 4;
/// Shared range of [`rgb_histograms`] when no infrared band is drawn.
pub const RGB_RANGE: (f64, f64) = (0.0, 255.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandHistogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl BandHistogram {
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Lower edge of every bin.
    pub fn lower_edges(&self) -> Vec<f64> {
        let width = self.bin_width();
        (0..self.counts.len()).map(|i| self.min + i as f64 * width).collect()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Equal-width histogram of the finite samples of a band.
///
/// Without an explicit range the band's own min/max are used. A degenerate range
/// is widened by 0.5 on each side. The last bin is closed on the right.
pub fn band_histogram(band: ArrayView2<f64>, bins: usize, range: Option<(f64, f64)>) -> BandHistogram {
    let bins = bins.max(1);
    let (mut min, mut max) = range.unwrap_or_else(|| {
        band.iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    });
    if !min.is_finite() || !max.is_finite() {
        // No finite samples
        return BandHistogram { min: 0.0, max: 1.0, counts: vec![0; bins] };
    }
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0; bins];
    for &value in band.iter().filter(|v| v.is_finite()) {
        if value < min || value > max {
            continue;
        }
        let bin = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }
    BandHistogram { min, max, counts }
}

/// Histogram of one band of an overlay, tagged with its band index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledHistogram {
    pub band: usize,
    pub label: &'static str,
    pub histogram: BandHistogram,
}

/// Red, green, blue and optionally near-infrared histograms on one shared range.
///
/// With the infrared band the range is `(0, max over the four bands)`, otherwise the
/// 8-bit range `(0, 255)`. Every requested band, band 4 included when `infrared` is
/// set, must exist.
pub fn rgb_histograms<S: RasterSource + ?Sized>(
    source: &S,
    rgb_bands: (usize, usize, usize),
    infrared: bool,
    bins: usize,
) -> Result<Vec<LabeledHistogram>> {
    let (red, green, blue) = rgb_bands;
    let mut bands = vec![(red, "red"), (green, "green"), (blue, "blue")];
    if infrared {
        bands.push((INFRARED_BAND, "infrared"));
    }

    let required = bands.iter().map(|&(band, _)| band).max().unwrap_or(0);
    let available = source.band_count();
    if required > available {
        return Err(Error::InsufficientBands { required, available });
    }

    let grids = bands
        .iter()
        .map(|&(band, _)| source.read_band(band))
        .collect::<Result<Vec<_>>>()?;
    let range = if infrared {
        let max = grids
            .iter()
            .flat_map(|grid| grid.iter())
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, |hi, &v| hi.max(v));
        (0.0, if max.is_finite() { max } else { 0.0 })
    } else {
        RGB_RANGE
    };

    Ok(bands
        .into_iter()
        .zip(grids)
        .map(|((band, label), grid)| LabeledHistogram {
            band,
            label,
            histogram: band_histogram(grid.view(), bins, Some(range)),
        })
        .collect())
}
