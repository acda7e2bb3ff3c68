//! Canned model client used in demo mode
//!
//! Answers with a fenced JSON itinerary shaped like a real model reply, built
//! from the trip details in the prompt. Coordinates are only given for places
//! the client actually knows; everywhere else activities have none.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};
use tracing::debug;

use super::ModelClient;
use crate::Result;
use crate::normalizer::MAX_DAY_NUMBER;

static TRIP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Create a (\d+)-day travel itinerary for (.+)\.\s*$")
        .expect("valid trip line regex")
});

static INTERESTS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Interests: (.+?)\s*$").expect("valid interests regex"));

const FALLBACK_DESTINATION: &str = "Paris";
const FALLBACK_DAYS: u32 = 2;
const TIMES: [&str; 2] = ["09:00", "14:00"];

/// (name, location, coordinates, estimated cost)
type Landmark = (&'static str, &'static str, Option<(f64, f64)>, f64);

const PARIS_LANDMARKS: &[Landmark] = &[
    ("Visit the Louvre", "Rue de Rivoli", Some((48.8606, 2.3376)), 22.0),
    ("Local food tour", "Le Marais", Some((48.8590, 2.3620)), 95.0),
    ("City walk along the Seine", "Quai de la Tournelle", None, 0.0),
    ("Nightlife exploration", "Pigalle", Some((48.8822, 2.3375)), 60.0),
    ("Eiffel Tower summit", "Champ de Mars", Some((48.8584, 2.2945)), 28.0),
    ("Montmartre and Sacré-Cœur", "Montmartre", Some((48.8867, 2.3431)), 0.0),
];

/// The trip a prompt asks for
#[derive(Debug, Clone, PartialEq)]
struct DemoTrip {
    destination: String,
    days: u32,
    interests: Vec<String>,
}

impl DemoTrip {
    fn from_prompt(prompt: &str) -> Self {
        let (days, destination) = TRIP_LINE
            .captures(prompt)
            .and_then(|captures| {
                let days = captures[1].parse::<u32>().ok()?;
                Some((days, captures[2].trim().to_string()))
            })
            .filter(|(days, destination)| *days > 0 && !destination.is_empty())
            .unwrap_or_else(|| (FALLBACK_DAYS, FALLBACK_DESTINATION.to_string()));

        let interests = INTERESTS_LINE
            .captures(prompt)
            .map(|captures| {
                captures[1]
                    .split(',')
                    .map(str::trim)
                    .filter(|interest| !interest.is_empty())
                    .filter(|interest| !interest.eq_ignore_ascii_case("general sightseeing"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            destination,
            days: days.min(MAX_DAY_NUMBER),
            interests,
        }
    }

    /// Activities to spread over the days, two per day
    fn activity_pool(&self) -> Vec<Landmark> {
        if self.destination.eq_ignore_ascii_case("paris") {
            return PARIS_LANDMARKS.to_vec();
        }
        let mut pool: Vec<Landmark> = self
            .interests
            .iter()
            .map(|interest| match interest.to_lowercase().as_str() {
                "food" => ("Local food tour", "Old town", None, 60.0),
                "heritage" => ("Visit heritage site", "Historic centre", None, 20.0),
                "nightlife" => ("Nightlife exploration", "Entertainment district", None, 50.0),
                "adventure" => ("Outdoor adventure excursion", "City outskirts", None, 80.0),
                "nature" => ("Nature walk", "City park", None, 0.0),
                "shopping" => ("Market and shopping stroll", "Main market", None, 40.0),
                _ => ("Interest-led outing", "City centre", None, 30.0),
            })
            .collect();
        pool.push(("City walk", "City centre", None, 0.0));
        pool.push(("Sunset viewpoint", "Lookout", None, 0.0));
        pool
    }

    fn itinerary(&self) -> Value {
        let pool = self.activity_pool();
        let days: Vec<Value> = (1..=self.days)
            .map(|day| {
                let first = (day as usize - 1) * TIMES.len();
                let activities: Vec<Value> = TIMES
                    .iter()
                    .enumerate()
                    .map(|(slot, time)| {
                        let (name, location, coordinates, cost) =
                            pool[(first + slot) % pool.len()];
                        let mut activity = json!({
                            "name": name,
                            "time": time,
                            "location": location,
                            "estimated_cost": cost,
                        });
                        if let Some((lat, lon)) = coordinates {
                            activity["coordinates"] = json!({"lat": lat, "lon": lon});
                        }
                        activity
                    })
                    .collect();
                json!({
                    "day": day,
                    "title": format!("Exploring {}", self.destination),
                    "activities": activities,
                })
            })
            .collect();

        json!({
            "destination": self.destination,
            "days": days,
            "cost_breakdown": {
                "transport": {"flights": 200, "local_transport": 50},
                "food": {"breakfast": 30, "lunch": 50, "dinner": 70},
                "activities": {"tours": 100, "tickets": 50},
                "accommodation": {"hotel": 300}
            }
        })
    }
}

/// Answers every prompt with a plausible itinerary for the requested trip
#[derive(Debug, Clone, Default)]
pub struct DemoModelClient;

impl DemoModelClient {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelClient for DemoModelClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let trip = DemoTrip::from_prompt(prompt);
        debug!(
            "Demo client answering for {} ({} days)",
            trip.destination, trip.days
        );
        Ok(format!("```json\n{:#}\n```", trip.itinerary()))
    }

    fn name(&self) -> &str {
        "demo"
    }
}
