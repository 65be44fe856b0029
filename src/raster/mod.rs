mod source;
mod memory;
mod geotiff;

pub use source::{RasterGrid, RasterInfo, RasterOpener, RasterSource};
pub use memory::{MemoryOpener, MemoryRaster};
pub use geotiff::{TiffRaster, TiffRasterOpener};
