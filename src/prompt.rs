//! Prompt construction for itinerary generation

use crate::models::TripRequest;

const RESPONSE_SHAPE: &str = r#"{
  "destination": "string",
  "days": [
    {
      "day": 1,
      "title": "short theme for the day",
      "activities": [
        {
          "name": "string",
          "time": "e.g. 09:00 or Morning",
          "location": "place or neighbourhood",
          "coordinates": {"lat": 0.0, "lon": 0.0},
          "estimated_cost": 0.0
        }
      ]
    }
  ],
  "cost_breakdown": {
    "transport": {"flights": 0, "local_transport": 0},
    "food": {"breakfast": 0, "lunch": 0, "dinner": 0},
    "activities": {"tickets": 0, "tours": 0},
    "accommodation": {"hotel": 0}
  }
}"#;

/// Build the model prompt for a trip request.
///
/// Pure and deterministic: interests are stored sorted, so equal requests
/// always produce byte-identical prompts.
#[must_use]
pub fn build_prompt(request: &TripRequest) -> String {
    let days = request.duration_days;
    let interests = if request.interests.is_empty() {
        "general sightseeing".to_string()
    } else {
        request
            .interests
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let day_word = if days == 1 { "day" } else { "days" };

    format!(
        "Create a {days}-day travel itinerary for {destination}.\n\
         Budget: {budget}\n\
         Interests: {interests}\n\
         \n\
         Plan exactly {days} {day_word}, numbered from 1 to {days}, with activities in chronological order.\n\
         For every activity give the real latitude and longitude of the place. \
         If you do not know them, omit the coordinates field instead of guessing.\n\
         Keep the sum of estimated costs within the budget.\n\
         \n\
         Respond with a single valid JSON object of this shape:\n\
         {shape}\n\
         Ensure the output is ONLY valid JSON without extra text or formatting.",
        destination = request.destination.trim(),
        budget = request.format_budget(),
        shape = RESPONSE_SHAPE,
    )
}
