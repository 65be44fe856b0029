use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use glob::{glob, Pattern};
use tracing::warn;

const RASTER_EXTENSION: &str = "tif";
const SERIES_NAME_SEPARATOR: &str = "__";

/// `.tif` files directly inside `folder`, sorted by name.
pub fn list_rasters<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.{}", escaped(folder.as_ref())?, RASTER_EXTENSION);
    collect_matches(&pattern)
}

/// Every folder under `root` (including `root`) that directly contains `.tif` files.
pub fn discover_series_folders<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.{}", escaped(root.as_ref())?, RASTER_EXTENSION);
    let folders: BTreeSet<PathBuf> = collect_matches(&pattern)?
        .into_iter()
        .filter_map(|path| path.parent().map(Path::to_path_buf))
        .collect();
    Ok(folders.into_iter().collect())
}

/// Output name for a series folder, unique among the folders of one `root`.
///
/// Components of the path below `root` are joined with `__`, so tiles sharing a leaf
/// folder name (`6468_3360/Raster/48N-104E` and `6475_3361/Raster/48N-104E`) stay
/// apart. The root itself is named after its last component.
pub fn series_name<R: AsRef<Path>, F: AsRef<Path>>(root: R, folder: F) -> String {
    let folder = folder.as_ref();
    let components: Vec<String> = folder
        .strip_prefix(root.as_ref())
        .map(|relative| {
            relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    if !components.is_empty() {
        return components.join(SERIES_NAME_SEPARATOR);
    }
    folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "series".to_string())
}

fn escaped(folder: &Path) -> Result<String> {
    let folder = folder
        .to_str()
        .with_context(|| format!("Path is not valid UTF-8: {:?}", folder))?;
    Ok(Pattern::escape(folder.trim_end_matches('/')))
}

fn collect_matches(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for entry in glob(pattern).with_context(|| format!("Failed to read glob pattern {}", pattern))? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Unreadable entry during discovery"),
        }
    }
    paths.sort();
    Ok(paths)
}
