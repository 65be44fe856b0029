use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use ndarray::{Array2, Array3};
use tiff::encoder::{colortype, TiffEncoder};
use crate::imagery::min_max_stretch;
use crate::model::LandCoverClass;

fn class_to_color(class: LandCoverClass) -> Rgb<u8> {
    match class {
        LandCoverClass::ImperviousSurfaces => Rgb([128, 128, 128]),
        LandCoverClass::Agriculture => Rgb([230, 200, 60]),
        LandCoverClass::Forest => Rgb([20, 110, 40]),
        LandCoverClass::Wetlands => Rgb([70, 160, 150]),
        LandCoverClass::Soil => Rgb([150, 100, 50]),
        LandCoverClass::Water => Rgb([30, 80, 200]),
        LandCoverClass::Snow => Rgb([235, 245, 255]),
    }
}

fn to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// (width, height) of an image for a (rows, cols) grid.
fn dims(shape: (usize, usize)) -> Result<(u32, u32)> {
    let (rows, cols) = shape;
    let width = u32::try_from(cols).with_context(|| format!("Grid width {} does not fit an image", cols))?;
    let height = u32::try_from(rows).with_context(|| format!("Grid height {} does not fit an image", rows))?;
    Ok((width, height))
}

/// Band stretched onto 0..=255 grey levels.
pub fn band_image(band: &Array2<f64>) -> Result<GrayImage> {
    let stretched = min_max_stretch(band.view());
    let (width, height) = dims(stretched.dim())?;
    Ok(GrayImage::from_fn(width, height, |x, y| Luma([to_u8(stretched[(y as usize, x as usize)])])))
}

/// Class band drawn in the class colour over black, intensity from the stretched band.
pub fn class_image(band: &Array2<f64>, class: LandCoverClass) -> Result<RgbImage> {
    let stretched = min_max_stretch(band.view());
    let Rgb(color) = class_to_color(class);
    let (width, height) = dims(stretched.dim())?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let weight = stretched[(y as usize, x as usize)].clamp(0.0, 1.0);
        Rgb(color.map(|c| (c as f64 * weight).round() as u8))
    }))
}

pub fn mask_image(mask: &Array2<u8>) -> Result<GrayImage> {
    let (width, height) = dims(mask.dim())?;
    Ok(GrayImage::from_fn(width, height, |x, y| {
        Luma([if mask[(y as usize, x as usize)] > 0 { 255 } else { 0 }])
    }))
}

/// Red (-1) through yellow (0) to green (1).
pub fn ndvi_image(ndvi: &Array2<f64>) -> Result<RgbImage> {
    let (width, height) = dims(ndvi.dim())?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let v = ndvi[(y as usize, x as usize)].clamp(-1.0, 1.0);
        if v < 0.0 {
            let t = v + 1.0;
            Rgb([215, to_u8(t * 0.85), 40])
        } else {
            Rgb([to_u8((1.0 - v) * 0.85), to_u8(0.85 - v * 0.25), 40])
        }
    }))
}

pub fn rgb_image(composite: &Array3<f64>) -> Result<RgbImage> {
    let (rows, cols, _) = composite.dim();
    let (width, height) = dims((rows, cols))?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let (r, c) = (y as usize, x as usize);
        Rgb([to_u8(composite[(r, c, 0)]), to_u8(composite[(r, c, 1)]), to_u8(composite[(r, c, 2)])])
    }))
}

/// Single band 32-bit float TIFF, row-major.
pub fn save_float_tiff<P: AsRef<Path>>(grid: &Array2<f64>, path: P) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = dims(grid.dim())?;
    let file = File::create(path).with_context(|| format!("Could not create {}", path.display()))?;
    let data: Vec<f32> = grid.iter().map(|&v| v as f32).collect();
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    encoder.write_image::<colortype::Gray32Float>(width, height, &data)?;
    Ok(())
}

pub fn save_png<I, P>(image: I, path: P) -> Result<()>
where
    I: Into<DynamicImage>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    image.into().save(path).with_context(|| format!("Could not write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use crate::raster::{RasterSource, TiffRaster};
    use super::*;

    #[test]
    fn test_mask_image() {
        let mask = array![[0u8, 1, 1], [1, 0, 0]];
        let img = mask_image(&mask).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(1, 0), &Luma([255]));
        assert_eq!(img.get_pixel(1, 1), &Luma([0]));
    }

    #[test]
    fn test_class_image_uses_class_color() {
        let band = array![[0.0, 1.0]];
        let img = class_image(&band, LandCoverClass::Water).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &class_to_color(LandCoverClass::Water));
    }

    #[test]
    fn test_ndvi_image_endpoints() {
        let img = ndvi_image(&array![[-1.0, 1.0]]).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([215, 0, 40]));
        assert_eq!(img.get_pixel(1, 0)[1], to_u8(0.6));
    }

    #[test]
    fn test_float_tiff_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ndvi.tif");
        let grid = array![[0.5, -0.25, 0.0], [1.0, -1.0, 0.125]];
        save_float_tiff(&grid, &path).unwrap();
        let raster = TiffRaster::open(&path).unwrap();
        assert_eq!(raster.band_count(), 1);
        assert_eq!(raster.read_band(1).unwrap(), grid);
    }

    #[test]
    fn test_png_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.png");
        save_png(band_image(&array![[0.0, 10.0], [5.0, 10.0]]).unwrap(), &path).unwrap();
        let img = image::open(&path).unwrap().into_luma8();
        assert_eq!(img.get_pixel(1, 1), &Luma([255]));
        assert_eq!(img.get_pixel(0, 1), &Luma([128]));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        assert_eq!(dims((2, 3)).unwrap(), (3, 2));
        assert!(dims((1, u32::MAX as usize + 1)).is_err());
        assert!(dims((u32::MAX as usize + 1, 1)).is_err());
    }
}
