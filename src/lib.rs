pub mod config;
pub mod detection;
pub mod discovery;
pub mod error;
pub mod evolution;
pub mod imagery;
pub mod model;
pub mod output;
pub mod raster;
pub mod statistics;

pub use error::{Error, Result};
