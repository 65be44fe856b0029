use ndarray::ArrayView2;
use ndarray_stats::QuantileExt;
use tracing::trace;

/// Percentage of a band's area covered by its class, in [0, 100].
///
/// The band is normalised by its own maximum before averaging, so 0/1 masks,
/// 0/255 masks and continuous confidence rasters are comparable. Non-finite
/// samples count as absent.
///
/// Degenerate bands resolve to 0 without dividing:
/// - no pixels,
/// - pixel sum exactly 0 (class absent),
/// - maximum not positive (nothing to normalise against).
pub fn coverage_percentage(band: ArrayView2<f64>) -> f64 {
    let pixel_count = band.len();
    if pixel_count == 0 {
        return 0.0;
    }

    let finite = band.mapv(|v| if v.is_finite() { v } else { 0.0 });
    if finite.sum() == 0.0 {
        return 0.0;
    }

    let band_max = match finite.max() {
        Ok(&max) if max > 0.0 => max,
        _ => {
            trace!("Band has no positive maximum, coverage set to 0");
            return 0.0;
        }
    };

    let total_normalized = finite.mapv(|v| v / band_max).sum();
    (total_normalized / pixel_count as f64 * 100.0).clamp(0.0, 100.0)
}
