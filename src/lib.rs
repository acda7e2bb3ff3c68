//! `TripAI` - Personalized AI trip planning
//!
//! This library turns a destination, budget, trip length and interests into
//! a day-by-day itinerary generated by a language model, then renders it as
//! text, an interactive map view and a downloadable PDF.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod logging;
pub mod map;
pub mod models;
pub mod normalizer;
pub mod planner;
pub mod prompt;
pub mod web;

// Re-export core types for public API
pub use config::TripAiConfig;
pub use error::TripAiError;
pub use export::{PdfExporter, render_pdf, render_text};
pub use llm::{DemoModelClient, GeminiClient, ModelClient};
pub use map::{MapMarker, MapView, TileLayer};
pub use models::{Activity, Coordinates, CostItem, DayPlan, Itinerary, TripRequest};
pub use normalizer::normalize;
pub use planner::TripPlanner;
pub use prompt::build_prompt;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripAiError>;
