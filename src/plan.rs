//! Trip plan assembly and date parsing

use crate::entities::EntityResult;
use crate::places::Place;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Places scheduled per day at most
const PLACES_PER_DAY: usize = 3;

/// Longest itinerary we lay out day by day
const MAX_DAYS: usize = 14;

static NIGHTS_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*박\s*(\d+)\s*일").expect("valid regex"));
static DAYS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*일\s*(?:간|동안|여행|일정)?$").expect("valid regex"));

/// Concrete dates recovered from `travel_dates`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ParsedDates {
    /// Accepts `YYYY-MM-DD` or a range joined by `~`, `/` or ` to `.
    /// Relative phrases and the undetermined sentinel give `None`.
    pub fn parse(travel_dates: &str) -> Option<Self> {
        let text = travel_dates.trim();
        let iso = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok();

        for sep in ["~", " to ", "/"] {
            if let Some((a, b)) = text.split_once(sep) {
                let (start, end) = (iso(a)?, iso(b)?);
                return (start <= end).then_some(Self { start, end });
            }
        }

        iso(text).map(|day| Self {
            start: day,
            end: day,
        })
    }

    /// Like [`Self::parse`], but a lone start date is stretched over the
    /// stay length ("2박3일" from 10-04 ends on 10-06). Explicit ranges win.
    pub fn resolve(travel_dates: &str, duration: &str) -> Option<Self> {
        let dates = Self::parse(travel_dates)?;
        if dates.start != dates.end {
            return Some(dates);
        }
        let stay = duration_days(duration).unwrap_or(1).clamp(1, MAX_DAYS);
        let end = dates
            .start
            .checked_add_days(chrono::Days::new(u64::try_from(stay - 1).ok()?))?;
        Some(Self { end, ..dates })
    }

    pub fn days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(1)
    }
}

/// Number of days a duration phrase describes ("2박3일" -> 3, "당일치기" -> 1)
pub fn duration_days(duration: &str) -> Option<usize> {
    let duration = duration.trim();
    if duration.contains("당일") {
        return Some(1);
    }
    if let Some(caps) = NIGHTS_DAYS.captures(duration) {
        return caps[2].parse().ok();
    }
    DAYS_ONLY
        .captures(duration)
        .and_then(|caps| caps[1].parse().ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date: Option<NaiveDate>,
    pub places: Vec<Place>,
}

/// Day-by-day outline handed back with a planning response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelPlan {
    pub destination: String,
    pub regions: Vec<String>,
    pub cities: Vec<String>,
    pub categories: Vec<String>,
    pub travel_type: crate::entities::TravelType,
    pub duration: String,
    pub travel_dates: String,
    pub days: Vec<DayPlan>,
}

impl TravelPlan {
    /// Spread `places` over the trip, in order, a few per day.
    pub fn assemble(entities: &EntityResult, places: &[Place], dates: Option<ParsedDates>) -> Self {
        let day_count = dates
            .map(|d| d.days())
            .or_else(|| duration_days(&entities.duration))
            .unwrap_or(1)
            .clamp(1, MAX_DAYS);

        let mut days: Vec<DayPlan> = (1..=day_count)
            .map(|day| DayPlan {
                day,
                date: dates.and_then(|d| {
                    d.start
                        .checked_add_days(chrono::Days::new(u64::try_from(day - 1).ok()?))
                }),
                places: Vec::new(),
            })
            .collect();

        for (i, place) in places.iter().take(day_count * PLACES_PER_DAY).enumerate() {
            days[i % day_count].places.push(place.clone());
        }

        Self {
            destination: entities.destination().unwrap_or("미정").to_string(),
            regions: entities.regions.clone(),
            cities: entities.cities.clone(),
            categories: entities.categories.clone(),
            travel_type: entities.travel_type,
            duration: entities.duration.clone(),
            travel_dates: entities.travel_dates.clone(),
            days,
        }
    }

    /// Plain-text outline, one line per day
    pub fn summary(&self) -> String {
        self.days
            .iter()
            .map(|d| {
                let label = d
                    .date
                    .map_or_else(|| format!("{}일차", d.day), |date| format!("{}일차 ({date})", d.day));
                if d.places.is_empty() {
                    format!("{label}: 자유 일정")
                } else {
                    let names: Vec<_> = d.places.iter().map(|p| p.name.as_str()).collect();
                    format!("{label}: {}", names.join(" → "))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
