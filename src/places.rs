//! Place lookup used by the travel handlers
//!
//! Ranking is out of scope here; [`PlaceDirectory`] returns catalog order.

use crate::entities::EntityResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Place search unavailable: {0}")]
    Unavailable(String),
}

/// A place as surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Place {
    /// A bare named place, as configured for demo mode
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            city: None,
            category: None,
            description: None,
        }
    }
}

/// Narrow interface onto whatever backs place retrieval
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, entities: &EntityResult, limit: usize)
        -> Result<Vec<Place>, SearchError>;
}

/// In-memory directory loaded from the catalog file
#[derive(Debug, Clone, Default)]
pub struct PlaceDirectory {
    places: Vec<Place>,
}

impl PlaceDirectory {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn matches(place: &Place, entities: &EntityResult) -> bool {
        let located = (entities.regions.is_empty() && entities.cities.is_empty())
            || place
                .city
                .as_ref()
                .is_some_and(|c| entities.cities.contains(c))
            || place
                .region
                .as_ref()
                .is_some_and(|r| entities.regions.contains(r));

        let categorized = entities.categories.is_empty()
            || place
                .category
                .as_ref()
                .is_some_and(|c| entities.categories.contains(c));

        located && categorized
    }
}

#[async_trait]
impl PlaceSearch for PlaceDirectory {
    async fn search(
        &self,
        entities: &EntityResult,
        limit: usize,
    ) -> Result<Vec<Place>, SearchError> {
        if self.places.is_empty() {
            return Err(SearchError::Unavailable(
                "no places loaded from the catalog".to_string(),
            ));
        }
        // Without any anchor every place would match
        if !entities.has_anchor() {
            return Ok(Vec::new());
        }

        Ok(self
            .places
            .iter()
            .filter(|p| Self::matches(p, entities))
            .take(limit)
            .cloned()
            .collect())
    }
}
