//! Structured (JSON) model responses

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::{MAX_DAY_NUMBER, text};
use crate::models::{Activity, Coordinates, CostItem, DayPlan};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("valid fence regex"));

const DAY_LIST_KEYS: &[&str] = &["days", "plan", "itinerary", "daily_plan", "schedule"];
const DAY_TITLE_KEYS: &[&str] = &["title", "theme", "summary"];
const ACTIVITY_LIST_KEYS: &[&str] = &["activities", "items", "schedule", "events"];
const NAME_KEYS: &[&str] = &["name", "title", "activity", "description"];
const TIME_KEYS: &[&str] = &["time", "start_time", "when"];
const LOCATION_KEYS: &[&str] = &["location_label", "location", "place", "address"];
const COORDINATE_KEYS: &[&str] = &["coordinates", "coords", "geo", "position"];
const COST_KEYS: &[&str] = &["estimated_cost", "cost", "price"];
const BREAKDOWN_KEYS: &[&str] = &["cost_breakdown", "costs", "budget_breakdown"];

/// What a JSON response yielded
#[derive(Debug)]
pub(super) struct ParsedJson {
    pub destination: Option<String>,
    pub days: Vec<DayPlan>,
    pub cost_breakdown: Vec<CostItem>,
}

/// Try every JSON-looking slice of `raw`; the first one with days wins
pub(super) fn extract_from_text(raw: &str) -> Option<ParsedJson> {
    candidates(raw)
        .into_iter()
        .filter_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .filter_map(|value| extract(&value))
        .find(|parsed| !parsed.days.is_empty())
}

/// The whole text, fenced code blocks, then the outermost brace/bracket spans
fn candidates(raw: &str) -> Vec<&str> {
    let mut found = vec![raw];
    found.extend(
        FENCED_BLOCK
            .captures_iter(raw)
            .filter_map(|captures| captures.get(1))
            .map(|body| body.as_str().trim()),
    );
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (raw.find(open), raw.rfind(close)) {
            if start < end {
                found.push(&raw[start..=end]);
            }
        }
    }
    found.dedup();
    found
}

fn extract(value: &Value) -> Option<ParsedJson> {
    match value {
        Value::Array(days) => Some(ParsedJson {
            destination: None,
            days: parse_days(days),
            cost_breakdown: Vec::new(),
        }),
        Value::Object(object) => {
            let days = DAY_LIST_KEYS
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_array));

            let Some(days) = days else {
                // {"itinerary": {"days": [...]}}
                return object
                    .get("itinerary")
                    .filter(|inner| inner.is_object())
                    .and_then(extract);
            };

            Some(ParsedJson {
                destination: string_field(object, &["destination", "city"]),
                days: parse_days(days),
                cost_breakdown: BREAKDOWN_KEYS
                    .iter()
                    .find_map(|key| object.get(*key))
                    .map(parse_cost_breakdown)
                    .unwrap_or_default(),
            })
        }
        _ => None,
    }
}

fn parse_days(values: &[Value]) -> Vec<DayPlan> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let object = value.as_object()?;
            let position = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let day = object.get("day").and_then(day_number).unwrap_or(position);
            let activities = ACTIVITY_LIST_KEYS
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_array))
                .map(|items| items.iter().filter_map(parse_activity).collect())
                .unwrap_or_default();
            Some(DayPlan {
                day,
                title: string_field(object, DAY_TITLE_KEYS),
                activities,
            })
        })
        .collect()
}

fn day_number(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        // "Day 2"
        Value::String(s) => s
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .ok(),
        _ => None,
    };
    number.filter(|day| *day <= MAX_DAY_NUMBER)
}

fn parse_activity(value: &Value) -> Option<Activity> {
    match value {
        Value::String(line) => text::parse_activity_line(line),
        Value::Object(object) => parse_activity_object(object),
        _ => None,
    }
}

fn parse_activity_object(object: &Map<String, Value>) -> Option<Activity> {
    let Some(name) = string_field(object, NAME_KEYS) else {
        debug!("Dropping activity without a name: {:?}", object);
        return None;
    };

    let location = LOCATION_KEYS.iter().find_map(|key| object.get(*key));
    let location_label = match location {
        Some(Value::String(label)) => label.trim().to_string(),
        Some(Value::Object(place)) => {
            string_field(place, &["name", "label", "address"]).unwrap_or_default()
        }
        _ => String::new(),
    };

    let coordinates = COORDINATE_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(parse_coordinates)
        .or_else(|| coordinates_in(object))
        .or_else(|| match location {
            Some(Value::Object(place)) => coordinates_in(place),
            _ => None,
        });

    let time = TIME_KEYS
        .iter()
        .find_map(|key| match object.get(*key) {
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default();

    let estimated_cost = COST_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(amount);

    Some(Activity {
        name,
        time,
        location_label,
        coordinates,
        estimated_cost,
    })
}

/// `{"lat": .., "lon": ..}`, `[lat, lon]`, or `"lat, lon"`
fn parse_coordinates(value: &Value) -> Option<Coordinates> {
    match value {
        Value::Object(object) => coordinates_in(object),
        Value::Array(pair) if pair.len() == 2 => {
            Coordinates::checked(float(&pair[0])?, float(&pair[1])?)
        }
        Value::String(s) => {
            let (lat, lon) = s.split_once(',')?;
            Coordinates::checked(lat.trim().parse().ok()?, lon.trim().parse().ok()?)
        }
        _ => None,
    }
}

fn coordinates_in(object: &Map<String, Value>) -> Option<Coordinates> {
    let lat = ["lat", "latitude"]
        .iter()
        .find_map(|key| object.get(*key).and_then(float))?;
    let lon = ["lon", "lng", "long", "longitude"]
        .iter()
        .find_map(|key| object.get(*key).and_then(float))?;
    Coordinates::checked(lat, lon)
}

fn float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-negative money amount from a number or a string like "$25"
fn amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v >= 0.0),
        Value::String(s) => text::parse_amount(s),
        _ => None,
    }
}

/// Accepts `{category: total | {item: amount}}` or a list of cost items
fn parse_cost_breakdown(value: &Value) -> Vec<CostItem> {
    match value {
        Value::Object(categories) => categories
            .iter()
            .flat_map(|(category, details)| match details {
                Value::Object(items) => items
                    .iter()
                    .filter_map(|(item, value)| {
                        Some(CostItem {
                            category: category.clone(),
                            item: Some(item.clone()),
                            amount: amount(value)?,
                        })
                    })
                    .collect::<Vec<_>>(),
                other => amount(other)
                    .map(|total| CostItem {
                        category: category.clone(),
                        item: None,
                        amount: total,
                    })
                    .into_iter()
                    .collect(),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|entry| {
                let entry = entry.as_object()?;
                Some(CostItem {
                    category: string_field(entry, &["category"])?,
                    item: string_field(entry, &["item"]),
                    amount: entry.get("amount").and_then(amount)?,
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// First non-empty string among `keys`
fn string_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
