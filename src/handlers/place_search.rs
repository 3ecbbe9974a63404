//! Place recommendations for a location and/or category

use super::{CommandHandler, HandlerError, HandlerServices};
use crate::context::ContextBundle;
use crate::places::Place;
use crate::response::ResponseEnvelope;
use async_trait::async_trait;

pub(super) const CUES: &[&str] = &[
    "추천", "맛집", "카페", "관광지", "명소", "가볼 만한", "가볼만한", "갈 만한", "recommend",
];

const RESULT_LIMIT: usize = 10;

pub struct PlaceSearchHandler {
    services: HandlerServices,
}

impl PlaceSearchHandler {
    pub fn new(services: HandlerServices) -> Self {
        Self { services }
    }

    fn names_category(&self, message: &str) -> bool {
        self.services
            .extractor
            .catalog()
            .categories
            .iter()
            .any(|c| message.contains(c.as_str()))
    }

    fn listing(places: &[Place]) -> String {
        places
            .iter()
            .enumerate()
            .map(|(i, p)| match &p.description {
                Some(desc) => format!("{}. {} - {desc}", i + 1, p.name),
                None => format!("{}. {}", i + 1, p.name),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl CommandHandler for PlaceSearchHandler {
    fn name(&self) -> &'static str {
        "place_search"
    }

    fn priority(&self) -> i32 {
        60
    }

    fn applies(&self, message: &str, _ctx: &ContextBundle<'_>) -> Result<bool, HandlerError> {
        Ok(super::mentions_any(message, CUES) || self.names_category(message))
    }

    async fn execute(
        &self,
        message: &str,
        _ctx: &ContextBundle<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        let entities = self.services.extractor.extract(message).await;
        let places = self.services.find_places(&entities, RESULT_LIMIT).await?;

        if places.is_empty() {
            return Ok(ResponseEnvelope::ok(
                "조건에 맞는 장소를 찾지 못했어요. 지역이나 종류(카페, 맛집 등)를 함께 알려주세요.",
            )
            .with_places(places)
            .with_action_required(true));
        }

        let headline = match entities.destination() {
            Some(dest) => format!("{dest} 추천 장소 {}곳이에요.", places.len()),
            None => format!("추천 장소 {}곳이에요.", places.len()),
        };
        let formatted = format!("{headline}\n\n{}", Self::listing(&places));

        Ok(ResponseEnvelope::ok(headline)
            .with_formatted(formatted)
            .with_places(places))
    }
}
