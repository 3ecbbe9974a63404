//! Static catalog snapshot
//!
//! Loaded once at startup and shared read-only. An empty catalog is the
//! normal state before the operator has provided a catalog file.

use crate::places::{Place, PlaceDirectory};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed catalog {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Names the fallback extractor matches against
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.cities.is_empty() && self.categories.is_empty()
    }

    pub fn has_regions(&self) -> bool {
        !self.regions.is_empty()
    }
}

/// On-disk shape: the catalog lists plus the place directory
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(flatten)]
    catalog: Catalog,
    #[serde(default)]
    places: Vec<Place>,
}

/// Load the catalog file, or an empty catalog when no path is configured.
pub fn load(path: Option<&Path>) -> Result<(Catalog, PlaceDirectory), CatalogError> {
    let Some(path) = path else {
        tracing::warn!("No catalog configured; entity fallback will match nothing");
        return Ok((Catalog::default(), PlaceDirectory::default()));
    };

    let shown = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: shown.clone(),
        source,
    })?;
    let file: CatalogFile = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: shown.clone(),
        source,
    })?;

    let catalog = Catalog {
        regions: clean(file.catalog.regions),
        cities: clean(file.catalog.cities),
        categories: clean(file.catalog.categories),
    };

    tracing::info!(
        path = %shown,
        regions = catalog.regions.len(),
        cities = catalog.cities.len(),
        categories = catalog.categories.len(),
        places = file.places.len(),
        "Catalog loaded"
    );

    Ok((catalog, PlaceDirectory::new(file.places)))
}

/// Trim, drop blanks and duplicates, keep first-seen order
fn clean(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}
