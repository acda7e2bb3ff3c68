//! Trip planning pipeline
//!
//! validate → build prompt → one model call → normalize. Every step's error
//! ends the chain; nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use crate::Result;
use crate::llm::ModelClient;
use crate::models::{Itinerary, TripRequest};
use crate::models::trip::DEFAULT_MAX_DAYS;
use crate::normalizer::normalize;
use crate::prompt::build_prompt;

/// Runs the itinerary pipeline against a model client
#[derive(Clone)]
pub struct TripPlanner {
    client: Arc<dyn ModelClient>,
    max_days: u32,
}

impl TripPlanner {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            max_days: DEFAULT_MAX_DAYS,
        }
    }

    #[must_use]
    pub fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }

    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    pub fn model_name(&self) -> &str {
        self.client.name()
    }

    /// Generate an itinerary for `request`
    #[instrument(
        skip(self, request),
        fields(destination = %request.destination, days = request.duration_days)
    )]
    pub async fn plan(&self, request: &TripRequest) -> Result<Itinerary> {
        request.validate(self.max_days)?;

        let start_time = Instant::now();
        let prompt = build_prompt(request);
        let raw = self.client.complete(&prompt).await?;
        let mut itinerary = normalize(&raw, Some(request.duration_days))?;

        if itinerary.destination.is_empty() {
            itinerary.destination = request.destination.clone();
        }

        info!(
            "Planned {} activities over {} days in {:.3}s",
            itinerary.activity_count(),
            itinerary.days.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(itinerary)
    }
}
