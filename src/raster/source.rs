use std::path::Path;
use ndarray::Array2;
use crate::error::{Error, Result};

/// One band of one raster, shaped `(height, width)`.
pub type RasterGrid = Array2<f64>;

/// Read access to the bands of an opened raster. Dropping the source closes it.
pub trait RasterSource {
    fn band_count(&self) -> usize;

    /// `(height, width)` shared by every band.
    fn dimensions(&self) -> (usize, usize);

    /// Reads band `index`, counted from 1.
    fn read_band(&self, index: usize) -> Result<RasterGrid>;

    fn check_band(&self, index: usize) -> Result<()> {
        let band_count = self.band_count();
        if index == 0 || index > band_count {
            return Err(Error::BandNotFound { index, band_count });
        }
        Ok(())
    }

    fn info(&self) -> RasterInfo {
        let (height, width) = self.dimensions();
        RasterInfo { height, width, band_count: self.band_count() }
    }
}

/// Opens raster files into sources.
pub trait RasterOpener {
    type Source: RasterSource;

    fn open(&self, path: &Path) -> Result<Self::Source>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RasterInfo {
    pub height: usize,
    pub width: usize,
    pub band_count: usize,
}
