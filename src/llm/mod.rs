//! Language-model client boundary
//!
//! The planner only ever needs one operation: send a prompt, get raw text
//! back. Keeping that behind a trait lets tests and demo mode swap the
//! hosted API for something local.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::Result;
use crate::config::TripAiConfig;

pub mod demo;
pub mod gemini;

pub use demo::DemoModelClient;
pub use gemini::GeminiClient;

/// A single-shot text completion service
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` once and return the raw response text.
    ///
    /// Fails with a request error on network failure, timeout or a
    /// non-success status. Never retries.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Name shown in logs and the health endpoint
    fn name(&self) -> &str;
}

/// Create the model client selected by the configuration
pub fn create_client(config: &TripAiConfig) -> Result<Arc<dyn ModelClient>> {
    if config.demo_mode {
        info!("Demo mode enabled, itineraries come from a canned response");
        return Ok(Arc::new(DemoModelClient::new()));
    }
    Ok(Arc::new(GeminiClient::new(&config.model)?))
}
