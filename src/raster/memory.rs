use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use crate::raster::source::{RasterGrid, RasterOpener, RasterSource};

/// Raster held entirely in memory, one grid per band.
#[derive(Debug, Clone)]
pub struct MemoryRaster {
    bands: Vec<RasterGrid>,
    dimensions: (usize, usize),
}

impl MemoryRaster {
    pub fn new(bands: Vec<RasterGrid>) -> Result<Self> {
        let dimensions = bands.first().map(|band| band.dim()).unwrap_or((0, 0));
        for band in &bands {
            let (ar, ac) = band.dim();
            if (ar, ac) != dimensions {
                return Err(Error::SizeMismatch { er: dimensions.0, ec: dimensions.1, ar, ac });
            }
        }
        Ok(MemoryRaster { bands, dimensions })
    }

    pub fn into_bands(self) -> Vec<RasterGrid> {
        self.bands
    }
}

impl RasterSource for MemoryRaster {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    fn read_band(&self, index: usize) -> Result<RasterGrid> {
        self.check_band(index)?;
        Ok(self.bands[index - 1].clone())
    }
}

/// Serves in-memory rasters by path. Unknown paths fail like unreadable files.
#[derive(Debug, Clone, Default)]
pub struct MemoryOpener {
    rasters: HashMap<PathBuf, MemoryRaster>,
}

impl MemoryOpener {
    pub fn new() -> Self {
        MemoryOpener { rasters: HashMap::new() }
    }

    pub fn with_raster(mut self, path: impl Into<PathBuf>, raster: MemoryRaster) -> Self {
        self.rasters.insert(path.into(), raster);
        self
    }
}

impl RasterOpener for MemoryOpener {
    type Source = MemoryRaster;

    fn open(&self, path: &Path) -> Result<MemoryRaster> {
        self.rasters
            .get(path)
            .cloned()
            .ok_or_else(|| Error::raster_open(path, "no such raster"))
    }
}
