use std::path::Path;

use serde::Deserialize;

use super::model::{Catalog, CatalogError, Track};

/// On-disk catalog layout: a list of `[[tracks]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<Track>,
}

impl Catalog {
    /// Parse and validate a TOML catalog.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::new(file.tracks)
    }

    /// Read, parse and validate the TOML catalog at `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
