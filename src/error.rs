use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not open raster {path:?}: {source}")]
    RasterOpen {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("band {index} not found, raster has {band_count} band(s)")]
    BandNotFound { index: usize, band_count: usize },

    #[error("insufficient bands: band {required} requested, raster has {available}")]
    InsufficientBands { required: usize, available: usize },

    #[error("raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("raster contains no pixels")]
    EmptyRaster,

    #[error("unsupported pixel format in TIFF")]
    UnsupportedPixelFormat,

    #[error("not a YYYY-MM-DD date label: {0:?}")]
    DateParse(String),

    #[error("shape mismatch or conversion error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn raster_open<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::RasterOpen { path: path.into(), source: source.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
