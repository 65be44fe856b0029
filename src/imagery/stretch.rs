use ndarray::{Array2, Array3, ArrayView2, Axis};
use crate::error::{Error, Result};
use crate::imagery::indices::check_band_index;
use crate::raster::RasterSource;

pub const DEFAULT_RGB_BANDS: (usize, usize, usize) = (3, 2, 1);

/// Linear stretch of the finite samples onto [0, 1]. A constant band becomes all zeros,
/// non-finite samples become 0.
pub fn min_max_stretch(band: ArrayView2<f64>) -> Array2<f64> {
    let (min, max) = band.iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if max <= min {
        return Array2::zeros(band.dim());
    }
    let range = max - min;
    band.mapv(|v| if v.is_finite() { (v - min) / range } else { 0.0 })
}

/// Stretched red/green/blue composite shaped `(height, width, 3)`.
pub fn rgb_composite<S: RasterSource + ?Sized>(source: &S, bands: (usize, usize, usize)) -> Result<Array3<f64>> {
    let available = source.band_count();
    if available < 3 {
        return Err(Error::InsufficientBands { required: 3, available });
    }
    let (red, green, blue) = bands;
    let (rows, cols) = source.dimensions();
    let mut composite = Array3::<f64>::zeros((rows, cols, 3));
    for (channel, index) in [red, green, blue].into_iter().enumerate() {
        check_band_index(source, index)?;
        let band = source.read_band(index)?;
        composite.index_axis_mut(Axis(2), channel).assign(&min_max_stretch(band.view()));
    }
    Ok(composite)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};
    use crate::raster::MemoryRaster;
    use super::*;

    #[test]
    fn test_stretch() {
        let band = array![[10.0, 20.0], [30.0, f64::NAN]];
        let stretched = min_max_stretch(band.view());
        assert_relative_eq!(stretched[[0, 0]], 0.0);
        assert_relative_eq!(stretched[[0, 1]], 0.5);
        assert_relative_eq!(stretched[[1, 0]], 1.0);
        assert_eq!(stretched[[1, 1]], 0.0);
    }

    #[test]
    fn test_constant_band_is_zero() {
        let band = Array2::from_elem((3, 3), 42.0);
        assert_eq!(min_max_stretch(band.view()), Array2::<f64>::zeros((3, 3)));
    }

    #[test]
    fn test_composite_channel_order() {
        let raster = MemoryRaster::new(vec![
            array![[0.0, 1.0]],
            array![[5.0, 5.0]],
            array![[2.0, 0.0]],
        ]).unwrap();
        let rgb = rgb_composite(&raster, DEFAULT_RGB_BANDS).unwrap();
        assert_eq!(rgb.dim(), (1, 2, 3));
        // red <- band 3, green <- band 2, blue <- band 1
        assert_eq!(rgb[[0, 0, 0]], 1.0);
        assert_eq!(rgb[[0, 1, 0]], 0.0);
        assert_eq!(rgb[[0, 0, 1]], 0.0);
        assert_eq!(rgb[[0, 1, 2]], 1.0);
    }

    #[test]
    fn test_composite_needs_three_bands() {
        let raster = MemoryRaster::new(vec![Array2::zeros((1, 1)); 2]).unwrap();
        assert!(matches!(
            rgb_composite(&raster, DEFAULT_RGB_BANDS),
            Err(Error::InsufficientBands { required: 3, available: 2 })
        ));
        let raster = MemoryRaster::new(vec![Array2::zeros((1, 1)); 3]).unwrap();
        assert!(matches!(
            rgb_composite(&raster, (4, 2, 1)),
            Err(Error::InsufficientBands { required: 4, available: 3 })
        ));
    }
}
