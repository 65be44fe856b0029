use crate::error::Result;
use crate::model::LandCoverClass;
use crate::raster::RasterSource;

/// Band indices (1-based, ascending) holding at least one non-zero pixel.
pub fn detect_classes<S: RasterSource + ?Sized>(source: &S) -> Result<Vec<usize>> {
    let mut classes = vec![];
    for index in 1..=source.band_count() {
        let band = source.read_band(index)?;
        if band.iter().any(|&v| v != 0.0) {
            classes.push(index);
        }
    }
    Ok(classes)
}

/// Detected bands that map onto a registered land-cover class.
pub fn detect_land_cover<S: RasterSource + ?Sized>(source: &S) -> Result<Vec<LandCoverClass>> {
    Ok(detect_classes(source)?
        .into_iter()
        .filter_map(|index| LandCoverClass::from_id(index as i64))
        .collect())
}
