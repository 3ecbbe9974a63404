//! Recovery of the structured object from free-form model output
//!
//! Models wrap JSON in prose or code fences often enough that the first
//! balanced `{...}` span is taken as the answer.

use super::{EntityResult, Intent, TravelType, UNDETERMINED};
use serde_json::{Map, Value};

/// Locate the first balanced `{...}` span, ignoring braces inside strings.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.get(start..)?.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return text.get(start..=start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse model output into an [`EntityResult`].
///
/// Returns `None` when no JSON object can be recovered; that is the signal
/// for the catalog fallback. Missing or mistyped fields take their defaults.
pub fn parse_entities(text: &str) -> Option<EntityResult> {
    let span = find_json_object(text)?;
    let Value::Object(fields) = serde_json::from_str::<Value>(span).ok()? else {
        return None;
    };

    Some(EntityResult {
        regions: string_list(&fields, "regions"),
        cities: string_list(&fields, "cities"),
        categories: string_list(&fields, "categories"),
        keywords: string_list(&fields, "keywords"),
        intent: label(&fields, "intent").map_or(Intent::General, Intent::from_label),
        travel_type: label(&fields, "travel_type").map_or(TravelType::General, TravelType::from_label),
        duration: text_or_undetermined(&fields, "duration"),
        travel_dates: text_or_undetermined(&fields, "travel_dates"),
    })
}

fn label<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Arrays keep their non-blank strings; a lone string becomes a one-item list
fn string_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    let clean = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(clean)
            .collect(),
        Some(Value::String(s)) => clean(s).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn text_or_undetermined(fields: &Map<String, Value>, key: &str) -> String {
    match label(fields, key).map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNDETERMINED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_object_in_prose_and_fences() {
        let text = "Sure! Here you go:\n```json\n{\"a\": {\"b\": 1}}\n```\nAnything else?";
        assert_eq!(find_json_object(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_find_object_ignores_braces_in_strings() {
        let text = r#"{"keywords": ["}{", "a\"}"]} trailing }"#;
        assert_eq!(find_json_object(text), Some(r#"{"keywords": ["}{", "a\"}"]}"#));
    }

    #[test]
    fn test_find_object_unbalanced() {
        assert_eq!(find_json_object("{\"regions\": [\"부산\""), None);
        assert_eq!(find_json_object("no json here"), None);
        assert_eq!(find_json_object(""), None);
    }

    #[test]
    fn test_first_object_wins() {
        let text = r#"{"intent": "weather"} {"intent": "general"}"#;
        assert_eq!(parse_entities(text).unwrap().intent, Intent::Weather);
    }

    #[test]
    fn test_missing_fields_default() {
        let result = parse_entities(r#"{"cities": ["강릉"]}"#).unwrap();
        assert_eq!(result.cities, vec!["강릉"]);
        assert!(result.regions.is_empty());
        assert!(result.keywords.is_empty());
        assert_eq!(result.intent, Intent::General);
        assert_eq!(result.travel_type, TravelType::General);
        assert_eq!(result.duration, UNDETERMINED);
        assert_eq!(result.travel_dates, UNDETERMINED);
    }

    #[test]
    fn test_tolerates_loose_types() {
        let result = parse_entities(
            r#"{"regions": "제주특별자치도", "cities": null, "categories": ["카페", 3, " "],
                "intent": 7, "travel_type": "Family", "duration": "", "travel_dates": "다음 달"}"#,
        )
        .unwrap();
        assert_eq!(result.regions, vec!["제주특별자치도"]);
        assert!(result.cities.is_empty());
        assert_eq!(result.categories, vec!["카페"]);
        assert_eq!(result.intent, Intent::General);
        assert_eq!(result.travel_type, TravelType::Family);
        assert_eq!(result.duration, UNDETERMINED);
        assert_eq!(result.travel_dates, "다음 달");
    }

    #[test]
    fn test_malformed_object_is_none() {
        assert!(parse_entities("{regions: [부산]}").is_none());
    }
}
