//! Structured travel intent extraction
//!
//! The model is asked first; when it is unavailable, fails, or answers with
//! nothing parsable, deterministic catalog matching takes over. Neither path
//! returns an error.

mod fallback;
mod parse;
mod prompt;

pub use fallback::fallback_entities;
pub use parse::parse_entities;
pub use prompt::render_prompt;

use crate::catalog::Catalog;
use crate::generation::TextGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sentinel for duration and dates nobody could pin down
pub const UNDETERMINED: &str = "undetermined";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TravelPlanning,
    PlaceSearch,
    Weather,
    #[default]
    General,
}

impl Intent {
    /// Unknown labels collapse to `General`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "travel_planning" => Intent::TravelPlanning,
            "place_search" => Intent::PlaceSearch,
            "weather" => Intent::Weather,
            _ => Intent::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelType {
    Family,
    Couple,
    Friends,
    Solo,
    Business,
    #[default]
    General,
}

impl TravelType {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "family" => TravelType::Family,
            "couple" => TravelType::Couple,
            "friends" => TravelType::Friends,
            "solo" => TravelType::Solo,
            "business" => TravelType::Business,
            _ => TravelType::General,
        }
    }

    pub fn label_ko(self) -> &'static str {
        match self {
            TravelType::Family => "가족 여행",
            TravelType::Couple => "커플 여행",
            TravelType::Friends => "친구와의 여행",
            TravelType::Solo => "혼자 떠나는 여행",
            TravelType::Business => "출장",
            TravelType::General => "여행",
        }
    }
}

/// Travel intent pulled out of one message.
///
/// Sequence fields are always present (possibly empty); `duration` and
/// `travel_dates` hold [`UNDETERMINED`] rather than nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityResult {
    pub regions: Vec<String>,
    pub cities: Vec<String>,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub intent: Intent,
    pub travel_type: TravelType,
    pub duration: String,
    pub travel_dates: String,
}

impl Default for EntityResult {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            cities: Vec::new(),
            categories: Vec::new(),
            keywords: Vec::new(),
            intent: Intent::General,
            travel_type: TravelType::General,
            duration: UNDETERMINED.to_string(),
            travel_dates: UNDETERMINED.to_string(),
        }
    }
}

impl EntityResult {
    /// Something a place lookup can filter on
    pub fn has_anchor(&self) -> bool {
        !(self.regions.is_empty() && self.cities.is_empty() && self.categories.is_empty())
    }

    pub fn dates_determined(&self) -> bool {
        self.travel_dates != UNDETERMINED
    }

    pub fn duration_determined(&self) -> bool {
        self.duration != UNDETERMINED
    }

    /// Most specific place name mentioned, city before region
    pub fn destination(&self) -> Option<&str> {
        self.cities
            .first()
            .or_else(|| self.regions.first())
            .map(String::as_str)
    }
}

/// Run extraction: model first, catalog matching when that yields nothing.
pub async fn extract_entities(
    query: &str,
    generator: Option<&dyn TextGenerator>,
    catalog: &Catalog,
) -> EntityResult {
    if catalog.is_empty() {
        tracing::debug!("Catalog not loaded; skipping generation");
        return fallback_entities(query, catalog);
    }

    let Some(generator) = generator else {
        return fallback_entities(query, catalog);
    };

    match generator.generate(&render_prompt(query)).await {
        Ok(text) => parse_entities(&text).unwrap_or_else(|| {
            tracing::warn!(
                output_len = text.len(),
                "No structured object in generation output; using catalog fallback"
            );
            fallback_entities(query, catalog)
        }),
        Err(e) => {
            tracing::warn!(
                error = %e,
                kind = ?e.kind,
                "Entity generation failed; using catalog fallback"
            );
            fallback_entities(query, catalog)
        }
    }
}

/// Extractor bound to its generator and catalog for the life of the process
pub struct EntityExtractor {
    generator: Option<Arc<dyn TextGenerator>>,
    catalog: Arc<Catalog>,
}

impl EntityExtractor {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, catalog: Arc<Catalog>) -> Self {
        Self { generator, catalog }
    }

    pub async fn extract(&self, query: &str) -> EntityResult {
        extract_entities(query, self.generator.as_deref(), &self.catalog).await
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
