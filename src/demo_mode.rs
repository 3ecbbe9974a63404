//! Operator-controlled demo mode
//!
//! While enabled, search-backed handlers answer with a fixed list of places
//! instead of querying the directory. One instance is built in `main` and
//! shared; tests build their own.

use crate::places::Place;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Snapshot reported to operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoStatus {
    pub enabled: bool,
    pub place_count: usize,
    pub places: Vec<String>,
}

/// Process-wide demo switch plus its canned place list.
///
/// The list is fixed at construction; only the flag changes, and each
/// operation reads or writes it exactly once.
#[derive(Debug, Default)]
pub struct DemoModeGate {
    enabled: AtomicBool,
    places: Vec<String>,
}

impl DemoModeGate {
    pub fn new(enabled: bool, places: Vec<String>) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            places: places
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Build from a comma-separated list such as `"해운대, 광안리,,감천문화마을"`
    pub fn from_csv(enabled: bool, csv: &str) -> Self {
        Self::new(enabled, csv.split(',').map(str::to_string).collect())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn enable(&self) -> String {
        let was = self.enabled.swap(true, Ordering::AcqRel);
        if !was {
            tracing::info!(places = self.places.len(), "Demo mode enabled");
        }
        format!("Demo mode enabled ({} places)", self.places.len())
    }

    pub fn disable(&self) -> String {
        let was = self.enabled.swap(false, Ordering::AcqRel);
        if was {
            tracing::info!("Demo mode disabled");
        }
        "Demo mode disabled".to_string()
    }

    /// Last writer wins if two operators toggle at once
    pub fn toggle(&self) -> String {
        if self.is_enabled() {
            self.disable()
        } else {
            self.enable()
        }
    }

    pub fn places(&self) -> &[String] {
        &self.places
    }

    /// Canned places as search results
    pub fn canned_places(&self) -> Vec<Place> {
        self.places.iter().map(Place::named).collect()
    }

    pub fn status(&self) -> DemoStatus {
        DemoStatus {
            enabled: self.is_enabled(),
            place_count: self.places.len(),
            places: self.places.clone(),
        }
    }
}
