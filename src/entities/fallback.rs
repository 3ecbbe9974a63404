//! Deterministic catalog matching used when the model path yields nothing

use super::EntityResult;
use crate::catalog::Catalog;

/// Administrative suffixes, longest first so "특별자치도" wins over "도"
const REGION_SUFFIXES: &[&str] = &[
    "특별자치도",
    "특별자치시",
    "특별시",
    "광역시",
    "자치도",
    "도",
    "시",
    "군",
    "구",
];

/// Short name of a region ("서울특별시" -> "서울"), if it has one.
///
/// Stripped names shorter than two characters are discarded; a bare "중"
/// from "중구" would match far too much.
pub(super) fn short_region_name(region: &str) -> Option<&str> {
    REGION_SUFFIXES
        .iter()
        .find_map(|suffix| region.strip_suffix(suffix))
        .filter(|short| short.chars().count() >= 2)
}

fn region_mentioned(query: &str, region: &str) -> bool {
    query.contains(region) || short_region_name(region).is_some_and(|short| query.contains(short))
}

/// Match catalog names against the query by substring.
///
/// Intent, travel type, duration and dates stay at their defaults. With no
/// regions loaded nothing is matched at all.
pub fn fallback_entities(query: &str, catalog: &Catalog) -> EntityResult {
    if !catalog.has_regions() {
        return EntityResult::default();
    }

    EntityResult {
        regions: matching(&catalog.regions, |r| region_mentioned(query, r)),
        cities: matching(&catalog.cities, |c| query.contains(c)),
        categories: matching(&catalog.categories, |c| query.contains(c)),
        ..EntityResult::default()
    }
}

fn matching(names: &[String], hit: impl Fn(&str) -> bool) -> Vec<String> {
    names.iter().filter(|n| hit(n.as_str())).cloned().collect()
}
