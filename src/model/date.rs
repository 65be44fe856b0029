use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use regex::Regex;
use serde::Serialize;
use crate::error::Error;

static DATE_IN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}[-_]\d{2}[-_]\d{2}").expect("Invalid regex"));

static DATE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex"));

/// Acquisition date of a raster in `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DateLabel(String);

impl DateLabel {
    /// First `YYYY?MM?DD` run in the name, where `?` is `-` or `_`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        DATE_IN_NAME
            .find(file_name)
            .map(|m| DateLabel(m.as_str().replace('_', "-")))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(DateLabel::from_file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DateLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if DATE_LABEL.is_match(s) {
            Ok(DateLabel(s.to_string()))
        } else {
            Err(Error::DateParse(s.to_string()))
        }
    }
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
