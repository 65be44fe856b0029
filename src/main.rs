use std::collections::HashSet;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use landcover_rust_utils_core::config::AnalysisConfig;
use landcover_rust_utils_core::detection::detect_classes;
use landcover_rust_utils_core::discovery::{discover_series_folders, list_rasters, series_name};
use landcover_rust_utils_core::evolution::FailurePolicy;
use landcover_rust_utils_core::imagery::{compute_spectral_index, rgb_composite, SpectralIndexParams, SpectralOutput};
use landcover_rust_utils_core::model::{name_of, LandCoverClass};
use landcover_rust_utils_core::output::render::{band_image, class_image, mask_image, ndvi_image, rgb_image, save_float_tiff, save_png};
use landcover_rust_utils_core::output::{save_evolution_chart, save_evolution_csv, save_report_json};
use landcover_rust_utils_core::raster::{RasterOpener, RasterSource, TiffRaster, TiffRasterOpener};
use landcover_rust_utils_core::statistics::{band_histogram, rgb_histograms, DEFAULT_BINS};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Class coverage over time for a folder of class rasters
    Evolution {
        /// Folder of .tif files, or a root to search with --recursive
        #[arg(short, long)]
        input: PathBuf,

        /// Process every folder below the input that contains .tif files
        #[arg(short, long)]
        recursive: bool,

        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        #[arg(long)]
        parallel: bool,

        /// Stop a series at its first unreadable raster instead of skipping it
        #[arg(long)]
        abort_on_error: bool,

        #[arg(long)]
        no_chart: bool,
    },
    /// Bands of a class raster holding data
    Classes {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// NDVI grid (float TIFF) or thresholded mask (PNG)
    Ndvi {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = 3)]
        red: usize,

        #[arg(long, default_value_t = 4)]
        nir: usize,

        #[arg(short, long)]
        threshold: Option<f64>,

        /// Colour preview of the NDVI grid
        #[arg(long)]
        preview: Option<PathBuf>,
    },
    /// Stretched RGB composite as PNG
    Rgb {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, value_delimiter = ',', default_values_t = [3, 2, 1])]
        bands: Vec<usize>,
    },
    /// One band as PNG, in its class colour with --class
    Band {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, default_value_t = 1)]
        band: usize,

        #[arg(long)]
        class: bool,
    },
    /// Histogram of one band, or of the RGB bands with --rgb, as JSON
    Histogram {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value_t = 1)]
        band: usize,

        /// Red, green and blue bands on a shared range instead of --band
        #[arg(long, value_delimiter = ',')]
        rgb: Option<Vec<usize>>,

        /// Add the near-infrared band 4 to the --rgb histograms
        #[arg(long, requires = "rgb")]
        infrared: bool,

        #[arg(long, default_value_t = DEFAULT_BINS)]
        bins: usize,
    },
    /// Size and band count of a raster
    Info {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match args.command {
        Command::Evolution { input, recursive, output_dir, parallel, abort_on_error, no_chart } => {
            let config = AnalysisConfig {
                parallel,
                failure_policy: if abort_on_error { FailurePolicy::Abort } else { FailurePolicy::SkipAndReport },
                ..Default::default()
            };
            let folders = if recursive { discover_series_folders(&input)? } else { vec![input.clone()] };
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("Could not create {}", output_dir.display()))?;
            let mut written = HashSet::new();
            for folder in folders {
                info!(folder = %folder.display(), "Processing folder");
                let name = series_name(&input, &folder);
                if !written.insert(name.clone()) {
                    error!(folder = %folder.display(), series = %name, "Series name already used, folder skipped");
                    continue;
                }
                if let Err(e) = process_series(&folder, &name, &output_dir, &config, !no_chart) {
                    error!(folder = %folder.display(), error = %format!("{:#}", e), "Error while processing folder");
                }
            }
        }
        Command::Classes { input } => {
            let raster = TiffRaster::open(&input)?;
            for band in detect_classes(&raster)? {
                println!("{}\t{}", band, name_of(band as i64));
            }
        }
        Command::Ndvi { input, output, red, nir, threshold, preview } => {
            let raster = TiffRaster::open(&input)?;
            let params = SpectralIndexParams { red_band: red, nir_band: nir, threshold };
            match compute_spectral_index(&raster, &params)? {
                SpectralOutput::Index(ndvi) => {
                    save_float_tiff(&ndvi, &output)?;
                    if let Some(preview) = preview {
                        save_png(ndvi_image(&ndvi)?, preview)?;
                    }
                }
                SpectralOutput::Mask(mask) => save_png(mask_image(&mask)?, &output)?,
            }
            info!(output = %output.display(), "NDVI saved");
        }
        Command::Rgb { input, output, bands } => {
            let &[r, g, b] = bands.as_slice() else {
                bail!("--bands takes exactly three band indices, got {:?}", bands);
            };
            let raster = TiffRaster::open(&input)?;
            save_png(rgb_image(&rgb_composite(&raster, (r, g, b))?)?, &output)?;
            info!(output = %output.display(), "RGB composite saved");
        }
        Command::Band { input, output, band, class } => {
            let raster = TiffRaster::open(&input)?;
            let grid = raster.read_band(band)?;
            match LandCoverClass::from_id(band as i64).filter(|_| class) {
                Some(land_cover) => save_png(class_image(&grid, land_cover)?, &output)?,
                None => save_png(band_image(&grid)?, &output)?,
            }
            info!(output = %output.display(), band, label = %name_of(band as i64), "Band saved");
        }
        Command::Histogram { input, band, rgb, infrared, bins } => {
            let raster = TiffRaster::open(&input)?;
            match rgb.as_deref() {
                Some(&[r, g, b]) => {
                    let histograms = rgb_histograms(&raster, (r, g, b), infrared, bins)?;
                    println!("{}", serde_json::to_string_pretty(&histograms)?);
                }
                Some(other) => bail!("--rgb takes exactly three band indices, got {:?}", other),
                None => {
                    let grid = raster.read_band(band)?;
                    let histogram = band_histogram(grid.view(), bins, None);
                    println!("{}", serde_json::to_string_pretty(&histogram)?);
                }
            }
        }
        Command::Info { input } => {
            let raster = TiffRasterOpener.open(&input)?;
            println!("{}", serde_json::to_string_pretty(&raster.info())?);
        }
    }
    Ok(())
}

fn process_series(folder: &Path, series_name: &str, output_dir: &Path, config: &AnalysisConfig, chart: bool) -> Result<()> {
    let rasters = list_rasters(folder)?;
    if rasters.is_empty() {
        bail!("No .tif files in {}", folder.display());
    }

    let report = config.aggregator(TiffRasterOpener).run(rasters.as_slice())?;

    let csv_path = output_dir.join(format!("{}.csv", series_name));
    save_evolution_csv(&report.matrix, &csv_path)?;
    info!(path = %csv_path.display(), "CSV saved");

    save_report_json(&report, series_name, output_dir.join(format!("{}.json", series_name)))?;

    if chart {
        let chart_path = output_dir.join(format!("{}.html", series_name));
        save_evolution_chart(&report.matrix, series_name, &chart_path)?;
        info!(path = %chart_path.display(), "Graph saved");
    }
    Ok(())
}
