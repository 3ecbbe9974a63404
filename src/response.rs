//! Response envelope produced by command handlers
//!
//! Every optional field is serialized even when unset (as `null`) so the
//! wire shape never changes between responses.

use crate::places::Place;
use crate::plan::{ParsedDates, TravelPlan};
use crate::render::render;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub response: String,
    pub success: bool,
    pub error: Option<String>,
    pub travel_plan: Option<TravelPlan>,
    pub action_required: Option<bool>,
    pub formatted_response: Option<String>,
    pub html_response: Option<String>,
    pub response_lines: Option<Vec<String>>,
    pub redirect_url: Option<String>,
    pub places: Option<Vec<Place>>,
    pub requested_dates: Option<String>,
    pub parsed_dates: Option<ParsedDates>,
    pub session_id: Option<String>,
}

impl ResponseEnvelope {
    pub fn ok(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            success: true,
            error: None,
            travel_plan: None,
            action_required: None,
            formatted_response: None,
            html_response: None,
            response_lines: None,
            redirect_url: None,
            places: None,
            requested_dates: None,
            parsed_dates: None,
            session_id: None,
        }
    }

    /// Failed envelope: `response` is what the user sees, `error` what went wrong
    pub fn failure(response: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::ok(response)
        }
    }

    pub fn with_travel_plan(mut self, plan: TravelPlan) -> Self {
        self.travel_plan = Some(plan);
        self
    }

    pub fn with_action_required(mut self, required: bool) -> Self {
        self.action_required = Some(required);
        self
    }

    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    pub fn with_places(mut self, places: Vec<Place>) -> Self {
        self.places = Some(places);
        self
    }

    pub fn with_dates(mut self, requested: impl Into<String>, parsed: Option<ParsedDates>) -> Self {
        self.requested_dates = Some(requested.into());
        self.parsed_dates = parsed;
        self
    }

    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted_response = Some(formatted.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Fill in the formatted, HTML and line renderings a handler left unset.
    ///
    /// Formatted text defaults to the response; HTML and lines derive from
    /// the formatted text.
    pub fn with_renderings(mut self) -> Self {
        let formatted = self
            .formatted_response
            .get_or_insert_with(|| self.response.clone())
            .clone();
        if self.html_response.is_none() || self.response_lines.is_none() {
            let (html, lines) = render(&formatted);
            self.html_response.get_or_insert(html);
            self.response_lines.get_or_insert(lines);
        }
        self
    }

    /// Wire form; every field present
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize response envelope");
            serde_json::json!({
                "response": "응답을 만드는 중 오류가 발생했습니다.",
                "success": false,
                "error": e.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const OPTIONAL_FIELDS: &[&str] = &[
        "error",
        "travel_plan",
        "action_required",
        "formatted_response",
        "html_response",
        "response_lines",
        "redirect_url",
        "places",
        "requested_dates",
        "parsed_dates",
        "session_id",
    ];

    #[test]
    fn test_unset_fields_serialize_as_null() {
        let value = ResponseEnvelope::ok("안녕하세요").to_value();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), OPTIONAL_FIELDS.len() + 2);
        for field in OPTIONAL_FIELDS {
            assert_eq!(object.get(*field), Some(&Value::Null), "field {field}");
        }
        assert_eq!(value["success"], true);
    }

    #[test]
    fn test_round_trip() {
        let envelope = ResponseEnvelope::ok("부산 여행")
            .with_places(vec![Place::named("해운대")])
            .with_dates("2025-10-04", ParsedDates::parse("2025-10-04"))
            .with_action_required(false)
            .with_session("s-1")
            .with_renderings();
        let back: ResponseEnvelope = serde_json::from_value(envelope.to_value()).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn test_failure_carries_both() {
        let envelope = ResponseEnvelope::failure("잠시 후 다시 시도해 주세요.", "boom");
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("boom"));
        assert!(!envelope.response.is_empty());
    }

    #[test]
    fn test_renderings_from_formatted_text() {
        let envelope = ResponseEnvelope::ok("short")
            .with_formatted("1일차\n2일차")
            .with_renderings();
        assert_eq!(envelope.html_response.as_deref(), Some("1일차<br>2일차"));
        assert_eq!(
            envelope.response_lines,
            Some(vec!["1일차".to_string(), "2일차".to_string()])
        );
        assert_eq!(envelope.response, "short");
    }

    #[test]
    fn test_renderings_default_to_response() {
        let envelope = ResponseEnvelope::ok("a\nb").with_renderings();
        assert_eq!(envelope.formatted_response.as_deref(), Some("a\nb"));
        assert_eq!(envelope.html_response.as_deref(), Some("a<br>b"));
    }
}
