//! Data models for the TripAI application
//!
//! This module contains the core domain models organized by concern:
//! - Trip: validated user input that seeds prompt generation
//! - Itinerary: the day-by-day plan recovered from the model response

pub mod itinerary;
pub mod trip;

// Re-export all public types for convenient access
pub use itinerary::{Activity, Coordinates, CostItem, DayPlan, Itinerary};
pub use trip::TripRequest;
