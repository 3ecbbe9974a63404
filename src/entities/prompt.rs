//! Extraction prompt
//!
//! Date normalization is delegated to the model through the rules below;
//! the parser does not re-validate what comes back.

use chrono::{Datelike, Local, NaiveDate};

const TEMPLATE: &str = r#"You extract travel intent from a Korean travel assistant user's message.
Respond with a single JSON object and nothing else.

Schema:
{
  "regions": [string],       // provinces/metropolitan areas, official names (e.g. "부산광역시", "제주특별자치도")
  "cities": [string],        // cities/towns/districts (e.g. "부산", "강릉")
  "categories": [string],    // place categories (e.g. "카페", "맛집", "관광지", "숙소")
  "keywords": [string],      // other notable terms
  "intent": "travel_planning" | "place_search" | "weather" | "general",
  "travel_type": "family" | "couple" | "friends" | "solo" | "business" | "general",
  "duration": string,        // as written (e.g. "2박3일", "당일치기") or "undetermined"
  "travel_dates": string     // see date rules, or "undetermined"
}

Date rules (today is {{TODAY}}):
- Month and day given ("10월 4일"): use the current year -> "{{YEAR}}-10-04".
- Day only ("4일부터"): use the current year and month -> "{{YEAR}}-{{MONTH}}-04".
- A range ("10월 4일부터 6일까지"): "YYYY-MM-DD~YYYY-MM-DD".
- Relative phrases ("다음 달", "이번 주말") stay as written.
- Nothing about dates: "undetermined".

Use [] for lists with nothing in them. Never invent places not in the message.

Example
Message: 부산 2박3일 10월 4일부터
JSON: {"regions": ["부산광역시"], "cities": ["부산"], "categories": [], "keywords": ["2박3일"], "intent": "travel_planning", "travel_type": "general", "duration": "2박3일", "travel_dates": "{{YEAR}}-10-04"}

Message: {{QUERY}}
JSON:"#;

/// Render the extraction prompt for `query` against today's local date
pub fn render_prompt(query: &str) -> String {
    render_prompt_on(query, Local::now().date_naive())
}

pub(super) fn render_prompt_on(query: &str, today: NaiveDate) -> String {
    TEMPLATE
        .replace("{{TODAY}}", &today.format("%Y-%m-%d").to_string())
        .replace("{{YEAR}}", &today.year().to_string())
        .replace("{{MONTH}}", &format!("{:02}", today.month()))
        // Query last so its text is never treated as a placeholder
        .replace("{{QUERY}}", query.trim())
}
