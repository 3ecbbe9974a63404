//! Trip planning: extract intent, gather places, lay out a day-by-day plan

use super::{CommandHandler, HandlerError, HandlerServices};
use crate::context::ContextBundle;
use crate::entities::EntityResult;
use crate::plan::{ParsedDates, TravelPlan};
use crate::response::ResponseEnvelope;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

pub(super) const CUES: &[&str] = &[
    "여행", "일정", "계획", "코스", "당일치기", "trip", "plan", "itinerary",
];

pub(super) static STAY_LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*박|\d+\s*일\s*(?:간|동안)").expect("valid regex"));

/// Places gathered for one plan
const PLAN_PLACE_LIMIT: usize = 9;

const ASK_DESTINATION: &str =
    "어디로 여행을 계획하고 계신가요? 지역이나 도시를 알려주시면 일정을 짜 드릴게요.";
const ASK_DATES: &str = "여행 날짜를 알려주시면 날짜별 일정으로 맞춰 드릴게요.";

pub struct TravelPlanHandler {
    services: HandlerServices,
}

impl TravelPlanHandler {
    pub fn new(services: HandlerServices) -> Self {
        Self { services }
    }

    fn headline(entities: &EntityResult, destination: &str) -> String {
        let mut parts = vec![destination.to_string()];
        if entities.duration_determined() {
            parts.push(entities.duration.clone());
        }
        parts.push(entities.travel_type.label_ko().to_string());
        format!("{} 일정을 준비했어요.", parts.join(" "))
    }

    /// Persist when the caller gave us a handle; the plan is returned either way
    fn persist(ctx: &ContextBundle<'_>, plan: &TravelPlan) -> Option<String> {
        let store = ctx.store()?;
        match store.save_trip(&ctx.user_id, &ctx.session_id, plan) {
            Ok(id) => Some(format!("/trips/{id}")),
            Err(e) => {
                tracing::warn!(error = %e, session_id = %ctx.session_id, "Failed to save trip plan");
                None
            }
        }
    }
}

#[async_trait]
impl CommandHandler for TravelPlanHandler {
    fn name(&self) -> &'static str {
        "travel_plan"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn applies(&self, message: &str, _ctx: &ContextBundle<'_>) -> Result<bool, HandlerError> {
        Ok(super::mentions_any(message, CUES) || STAY_LENGTH.is_match(message))
    }

    async fn execute(
        &self,
        message: &str,
        ctx: &ContextBundle<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        let entities = self.services.extractor.extract(message).await;
        let parsed = ParsedDates::resolve(&entities.travel_dates, &entities.duration);

        let Some(destination) = entities.destination().map(str::to_string) else {
            return Ok(ResponseEnvelope::ok(ASK_DESTINATION)
                .with_action_required(true)
                .with_dates(entities.travel_dates.clone(), parsed));
        };

        // A plan without places is still a plan
        let places = match self.services.find_places(&entities, PLAN_PLACE_LIMIT).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(error = %e, "Place search failed; planning free days");
                Vec::new()
            }
        };
        let plan = TravelPlan::assemble(&entities, &places, parsed);

        let headline = Self::headline(&entities, &destination);
        let mut formatted = format!("{headline}\n\n{}", plan.summary());
        if !entities.dates_determined() {
            formatted.push_str("\n\n");
            formatted.push_str(ASK_DATES);
        }

        tracing::info!(
            destination = %destination,
            days = plan.days.len(),
            places = places.len(),
            dates = %entities.travel_dates,
            "Travel plan assembled"
        );

        let redirect = Self::persist(ctx, &plan);
        let mut envelope = ResponseEnvelope::ok(headline)
            .with_formatted(formatted)
            .with_places(places)
            .with_dates(entities.travel_dates.clone(), parsed)
            .with_action_required(!entities.dates_determined())
            .with_travel_plan(plan);
        if let Some(url) = redirect {
            envelope = envelope.with_redirect(url);
        }
        Ok(envelope)
    }
}
