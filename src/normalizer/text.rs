//! Free-text model responses
//!
//! Heuristics for prose or markdown itineraries: `Day N` headers open a day,
//! bullet or numbered lines inside a day are activities. Activity lines may
//! carry a time, a cost, a coordinate pair and a location.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Activity, Coordinates, DayPlan};

static DAY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s#>*_]*day\s*(\d{1,3})\b[\s*_]*[:.)|\-–—]*[\s*_]*(.*)$")
        .expect("valid day header regex")
});

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•+–]|\d{1,2}[.)])\s+(.+)$").expect("valid bullet regex")
});

static PERIOD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[\s#*_]*(early morning|late morning|morning|midday|noon|late afternoon|afternoon|evening|late night|night)[\s*_]*:?[\s*_]*$",
    )
    .expect("valid period regex")
});

const CLOCK: &str = r"(?:\d{1,2}:\d{2}(?:\s*[ap]\.?m\b\.?)?|\d{1,2}\s*[ap]\.?m\b\.?)";

static CLOCK_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^({CLOCK}(?:\s*(?:-|–|to)\s*{CLOCK})?)\s*[-–—:|)]?\s*(.+)$"
    ))
    .expect("valid clock regex")
});

static PERIOD_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(early morning|late morning|morning|midday|noon|lunch|late afternoon|afternoon|evening|dinner|late night|night)\s*[:\-–—]\s*(.+)$",
    )
    .expect("valid period prefix regex")
});

// Only a bracketed or labelled pair counts; a bare "12.50, 8.00" is not a position
static COORDINATE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\(\s*(?:(?:coordinates|coords|gps|lat/?lo?ng?)\s*:?\s*)?",
        r"(-?\d{1,2}\.\d+)\s*°?\s*,\s*(-?\d{1,3}\.\d+)\s*°?\s*\)",
        r"|\b(?:coordinates|coords|gps|lat/?lo?ng?)\s*:?\s*\(?\s*",
        r"(-?\d{1,2}\.\d+)\s*°?\s*,\s*(-?\d{1,3}\.\d+)\s*°?\s*\)?",
    ))
    .expect("valid coordinate regex")
});

static CURRENCY_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\(?\s*(?:(?:~|approx\.?|about|around|est\.?|cost:?|price:?)\s*)?(?:[$€£¥]|usd\s*|eur\s*|gbp\s*)(\d[\d,]*(?:\.\d+)?)(?:\s*(?:per person|pp|each))?\s*\)?",
    )
    .expect("valid currency regex")
});

static LABELLED_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(?\s*(?:cost|price|entry|tickets?)\s*:\s*(\d[\d,]*(?:\.\d+)?)\s*\)?")
        .expect("valid labelled cost regex")
});

static FREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*free(?: entry| admission)?\s*\)").expect("valid free regex")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid number regex"));

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));

/// Split a free-text itinerary into days
pub(super) fn extract_days(raw: &str) -> Vec<DayPlan> {
    let mut days: Vec<DayPlan> = Vec::new();
    let mut in_day = false;
    let mut period: Option<String> = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(captures) = DAY_HEADER.captures(line) {
            let Some(day) = captures.get(1).and_then(|m| m.as_str().parse().ok()) else {
                continue;
            };
            let title = captures
                .get(2)
                .map(|m| clean_text(m.as_str()))
                .filter(|title| !title.is_empty());
            days.push(DayPlan {
                day,
                title,
                activities: Vec::new(),
            });
            in_day = true;
            period = None;
            continue;
        }

        if !in_day {
            continue;
        }

        if let Some(captures) = PERIOD_LABEL.captures(line) {
            period = captures.get(1).map(|m| capitalize(m.as_str()));
            continue;
        }

        let activity_text = if let Some(captures) = BULLET.captures(line) {
            captures.get(1).map(|m| m.as_str())
        } else if CLOCK_PREFIX.is_match(line) {
            Some(line)
        } else {
            if line.starts_with('#') || line.ends_with(':') || line.ends_with(":**") {
                // Some other section ("Budget tips:"), not part of the day
                in_day = false;
            }
            None
        };

        if let Some(mut activity) = activity_text.and_then(parse_activity_line) {
            if activity.time.is_empty() {
                if let Some(period) = &period {
                    activity.time = period.clone();
                }
            }
            if let Some(day) = days.last_mut() {
                day.activities.push(activity);
            }
        }
    }

    days
}

/// Parse one activity description such as
/// `"9:00 AM - Eiffel Tower @ Champ de Mars (48.8584, 2.2945) ~$28"`.
///
/// Returns `None` when no name is left once time, cost and coordinates are
/// taken out.
#[must_use]
pub fn parse_activity_line(line: &str) -> Option<Activity> {
    let mut rest = MARKDOWN_LINK.replace_all(line, "$1").replace(['*', '`'], "");
    rest = rest.replace("__", "");

    let mut time = String::new();
    let prefix = {
        let trimmed = rest.trim();
        CLOCK_PREFIX
            .captures(trimmed)
            .or_else(|| PERIOD_PREFIX.captures(trimmed))
            .map(|captures| (captures[1].trim().to_string(), captures[2].to_string()))
    };
    if let Some((found, remainder)) = prefix {
        if matches!(found.to_lowercase().as_str(), "lunch" | "dinner") {
            // Keep the meal in the name: "Lunch: bistro" is still about lunch
            rest = format!("{found}: {remainder}");
        } else {
            rest = remainder;
        }
        time = found;
    }

    // Costs first, so a price is never read as half of a coordinate pair
    let mut estimated_cost = None;
    for pattern in [&*CURRENCY_AMOUNT, &*LABELLED_AMOUNT] {
        let found = pattern
            .captures(&rest)
            .map(|captures| parse_number(&captures[1]));
        if let Some(cost) = found {
            estimated_cost = cost;
            rest = pattern.replace(&rest, " ").into_owned();
            break;
        }
    }
    if estimated_cost.is_none() && FREE.is_match(&rest) {
        estimated_cost = Some(0.0);
        rest = FREE.replace(&rest, " ").into_owned();
    }

    let mut coordinates = None;
    let pair = COORDINATE_PAIR.captures(&rest).map(|captures| {
        let lat = captures.get(1).or_else(|| captures.get(3));
        let lon = captures.get(2).or_else(|| captures.get(4));
        (
            lat.and_then(|m| m.as_str().parse::<f64>().ok()),
            lon.and_then(|m| m.as_str().parse::<f64>().ok()),
        )
    });
    if let Some((lat, lon)) = pair {
        if let (Some(lat), Some(lon)) = (lat, lon) {
            coordinates = Coordinates::checked(lat, lon);
        }
        rest = COORDINATE_PAIR.replace(&rest, " ").into_owned();
    }

    let mut name = clean_text(&rest);
    let mut location_label = String::new();
    if let Some((left, right)) = name.split_once(" @ ") {
        location_label = clean_text(right);
        name = clean_text(left);
    } else if let Some(index) = name.rfind(" at ") {
        location_label = clean_text(&name[index + 4..]);
    }

    if name.is_empty() {
        return None;
    }

    Some(Activity {
        name,
        time,
        location_label,
        coordinates,
        estimated_cost,
    })
}

/// Parse a money amount written by a human: "$1,200", "25 EUR", "Free"
#[must_use]
pub(super) fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.to_lowercase().starts_with("free") {
        return Some(0.0);
    }
    NUMBER.find(text).and_then(|m| parse_number(m.as_str()))
}

fn parse_number(text: &str) -> Option<f64> {
    text.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Collapse whitespace, drop empty brackets and stray separators
fn clean_text(text: &str) -> String {
    let collapsed = text
        .replace("()", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" ,", ",");
    collapsed
        .trim_matches(|c: char| {
            c.is_whitespace()
                || matches!(
                    c,
                    '-' | '–' | '—' | ':' | '|' | ',' | ';' | '*' | '_' | '#' | '~'
                )
        })
        .trim_end_matches('(')
        .trim_start_matches(')')
        .trim()
        .to_string()
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
