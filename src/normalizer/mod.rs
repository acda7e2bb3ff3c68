//! Itinerary normalization
//!
//! Turns whatever the model sent back into an [`Itinerary`]. Structured JSON
//! is preferred (bare, fenced, or wrapped in prose); free text is the fallback.
//! Partial results always win over an error: only a response with no
//! recoverable activity at all is rejected.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument, warn};

use crate::models::{DayPlan, Itinerary};
use crate::{Result, TripAiError};

mod json;
mod text;

pub use text::parse_activity_line;

/// Highest day number taken from a response; larger ones are treated as absent
pub(crate) const MAX_DAY_NUMBER: u32 = 366;

/// Normalize a raw model response.
///
/// With `expected_days`, days numbered beyond it are dropped and missing day
/// numbers are filled with empty plans so the day count matches the request.
#[instrument(skip(raw), fields(raw_len = raw.len()))]
pub fn normalize(raw: &str, expected_days: Option<u32>) -> Result<Itinerary> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TripAiError::parse("empty response"));
    }

    let (destination, days, cost_breakdown) = match json::extract_from_text(raw) {
        Some(parsed) => {
            debug!("Recovered {} days from JSON", parsed.days.len());
            (parsed.destination, parsed.days, parsed.cost_breakdown)
        }
        None => {
            let days = text::extract_days(raw);
            debug!("Recovered {} days from free text", days.len());
            (None, days, Vec::new())
        }
    };

    if days.is_empty() {
        return Err(TripAiError::parse("no days recognized"));
    }

    let days = assemble_days(days, expected_days);
    let itinerary = Itinerary {
        destination: destination.unwrap_or_default(),
        days,
        cost_breakdown,
    };

    if itinerary.activity_count() == 0 {
        return Err(TripAiError::parse("no activities recognized"));
    }

    info!(
        "Normalized itinerary: {} days, {} activities",
        itinerary.days.len(),
        itinerary.activity_count()
    );
    Ok(itinerary)
}

/// Merge duplicate day numbers, order by day, and fit to the requested length
fn assemble_days(days: Vec<DayPlan>, expected_days: Option<u32>) -> Vec<DayPlan> {
    // Some models count from zero
    let offset = u32::from(days.iter().any(|day| day.day == 0));

    let mut merged: BTreeMap<u32, DayPlan> = BTreeMap::new();
    for mut day in days {
        let Some(number) = day.day.checked_add(offset) else {
            warn!("Dropping day numbered {}", day.day);
            continue;
        };
        day.day = number;
        match merged.get_mut(&day.day) {
            Some(existing) => {
                debug!("Merging duplicate day {}", day.day);
                if existing.title.is_none() {
                    existing.title = day.title;
                }
                existing.activities.append(&mut day.activities);
            }
            None => {
                merged.insert(day.day, day);
            }
        }
    }

    if let Some(expected) = expected_days {
        let extra: Vec<u32> = merged.range(expected + 1..).map(|(day, _)| *day).collect();
        if !extra.is_empty() {
            warn!("Dropping days beyond the requested {}: {:?}", expected, extra);
            for day in extra {
                merged.remove(&day);
            }
        }
        for day in 1..=expected {
            merged.entry(day).or_insert_with(|| {
                warn!("Model omitted day {}", day);
                DayPlan::empty(day)
            });
        }
    }

    merged.into_values().collect()
}
