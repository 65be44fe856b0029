use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::debug;
use crate::error::{Error, Result};
use crate::raster::source::{RasterGrid, RasterOpener, RasterSource};

const PLANAR_CONFIGURATION_SEPARATE: u32 = 2;
/// `NewSubfileType` bit 0: reduced-resolution copy of another image in the file.
const SUBFILE_REDUCED_RESOLUTION: u32 = 1;

/// A (Geo)TIFF file decoded into bands.
///
/// Every image directory contributes its samples as bands, in file order. A directory
/// with several samples per pixel (a 7-band class mask written by GDAL, an RGB scene)
/// is split into one band per sample, for both chunky and planar layouts. Overview
/// directories (reduced-resolution copies) are skipped.
#[derive(Debug, Clone)]
pub struct TiffRaster {
    path: PathBuf,
    bands: Vec<RasterGrid>,
    dimensions: (usize, usize),
}

impl TiffRaster {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::raster_open(path, e))?;
        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| Error::raster_open(path, e))?
            .with_limits(Limits::unlimited());

        let mut bands: Vec<RasterGrid> = Vec::new();
        let mut dimensions = None;
        loop {
            let overview = decoder
                .get_tag_u32(Tag::NewSubfileType)
                .map(|value| value & SUBFILE_REDUCED_RESOLUTION != 0)
                .unwrap_or(false);
            if overview {
                debug!(path = %path.display(), "Skipping overview image");
            } else {
                let (width, height) = decoder.dimensions().map_err(|e| Error::raster_open(path, e))?;
                let shape = (height as usize, width as usize);
                let planar = decoder
                    .get_tag_u32(Tag::PlanarConfiguration)
                    .map(|value| value == PLANAR_CONFIGURATION_SEPARATE)
                    .unwrap_or(false);
                let samples = decoding_result_to_f64(
                    decoder.read_image().map_err(|e| Error::raster_open(path, e))?,
                )?;

                match dimensions {
                    None => dimensions = Some(shape),
                    Some((er, ec)) if (er, ec) != shape => {
                        return Err(Error::SizeMismatch { er, ec, ar: shape.0, ac: shape.1 });
                    }
                    _ => {}
                }
                bands.extend(split_samples(samples, shape, planar)?);
            }

            if decoder.more_images() {
                decoder.next_image().map_err(|e| Error::raster_open(path, e))?;
            } else {
                break;
            }
        }

        debug!(path = %path.display(), bands = bands.len(), "Decoded TIFF");
        Ok(TiffRaster {
            path: path.to_path_buf(),
            bands,
            dimensions: dimensions.unwrap_or((0, 0)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RasterSource for TiffRaster {
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

#[derive(Debug, Clone, Copy, Default)]
pub struct TiffRasterOpener;

impl RasterOpener for TiffRasterOpener {
    type Source = TiffRaster;

    fn open(&self, path: &Path) -> Result<TiffRaster> {
        TiffRaster::open(path)
    }
}

fn decoding_result_to_f64(result: DecodingResult) -> Result<Vec<f64>> {
    let samples = match result {
        DecodingResult::U8(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F32(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F64(buf) => buf,
        #[allow(unreachable_patterns)]
        _ => return Err(Error::UnsupportedPixelFormat),
    };
    Ok(samples)
}

fn split_samples(samples: Vec<f64>, shape: (usize, usize), planar: bool) -> Result<Vec<RasterGrid>> {
    let pixels = shape.0 * shape.1;
    if pixels == 0 {
        return Err(Error::EmptyRaster);
    }
    if samples.len() % pixels != 0 || samples.is_empty() {
        return Err(Error::UnsupportedPixelFormat);
    }
    let per_pixel = samples.len() / pixels;
    if per_pixel == 1 {
        return Ok(vec![Array2::from_shape_vec(shape, samples)?]);
    }

    let mut bands = Vec::with_capacity(per_pixel);
    for band in 0..per_pixel {
        let values: Vec<f64> = if planar {
            samples[band * pixels..(band + 1) * pixels].to_vec()
        } else {
            samples.iter().skip(band).step_by(per_pixel).copied().collect()
        };
        bands.push(Array2::from_shape_vec(shape, values)?);
    }
    Ok(bands)
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use tiff::encoder::{colortype, TiffEncoder};
    use super::*;

    #[test]
    fn test_split_interleaved_samples() {
        let samples = vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0];
        let bands = split_samples(samples, (2, 2), false).unwrap();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0], array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(bands[1], array![[10.0, 20.0], [30.0, 40.0]]);
    }

    #[test]
    fn test_split_planar_samples() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 10.0, 20.0, 30.0, 40.0];
        let bands = split_samples(samples, (2, 2), true).unwrap();
        assert_eq!(bands[0], array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(bands[1], array![[10.0, 20.0], [30.0, 40.0]]);
    }

    #[test]
    fn test_split_rejects_ragged_buffer() {
        assert!(matches!(split_samples(vec![1.0; 5], (2, 2), false), Err(Error::UnsupportedPixelFormat)));
    }

    #[test]
    fn test_read_multipage_tiff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask_2020-01-01.tif");
        {
            let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
            encoder.write_image::<colortype::Gray8>(3, 2, &[0, 1, 0, 1, 1, 0]).unwrap();
            encoder.write_image::<colortype::Gray8>(3, 2, &[0, 0, 0, 0, 0, 0]).unwrap();
            encoder.write_image::<colortype::Gray32Float>(3, 2, &[0.5, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        }

        let raster = TiffRasterOpener.open(&path).unwrap();
        assert_eq!(raster.band_count(), 3);
        assert_eq!(raster.dimensions(), (2, 3));
        assert_eq!(raster.read_band(1).unwrap(), array![[0.0, 1.0, 0.0], [1.0, 1.0, 0.0]]);
        assert_eq!(raster.read_band(2).unwrap().sum(), 0.0);
        assert_eq!(raster.read_band(3).unwrap()[[0, 0]], 0.5);
        assert!(matches!(raster.read_band(4), Err(Error::BandNotFound { index: 4, band_count: 3 })));
    }

    #[test]
    fn test_overview_pages_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask_2021-06-01.tif");
        {
            let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
            encoder.write_image::<colortype::Gray8>(4, 4, &[1; 16]).unwrap();
            let mut overview = encoder.new_image::<colortype::Gray8>(2, 2).unwrap();
            overview.encoder().write_tag(Tag::NewSubfileType, SUBFILE_REDUCED_RESOLUTION).unwrap();
            overview.write_data(&[9; 4]).unwrap();
            encoder.write_image::<colortype::Gray8>(4, 4, &[0; 16]).unwrap();
        }

        let raster = TiffRaster::open(&path).unwrap();
        assert_eq!(raster.band_count(), 2);
        assert_eq!(raster.dimensions(), (4, 4));
        assert_eq!(raster.read_band(1).unwrap().sum(), 16.0);
        assert_eq!(raster.read_band(2).unwrap().sum(), 0.0);
    }

    #[test]
    fn test_read_multisample_tiff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.tif");
        {
            let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
            encoder.write_image::<colortype::RGB8>(2, 1, &[1, 2, 3, 4, 5, 6]).unwrap();
        }

        let raster = TiffRaster::open(&path).unwrap();
        assert_eq!(raster.band_count(), 3);
        assert_eq!(raster.read_band(1).unwrap(), array![[1.0, 4.0]]);
        assert_eq!(raster.read_band(3).unwrap(), array![[3.0, 6.0]]);
    }

    #[test]
    fn test_open_missing_or_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.tif");
        assert!(matches!(TiffRaster::open(&missing), Err(Error::RasterOpen { .. })));

        let corrupt = dir.path().join("corrupt.tif");
        std::fs::write(&corrupt, b"not a tiff").unwrap();
        assert!(matches!(TiffRaster::open(&corrupt), Err(Error::RasterOpen { .. })));
    }
}
