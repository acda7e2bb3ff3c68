//! Itinerary model: days, activities and cost breakdown

use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Accepts only finite, in-range pairs; anything else is treated as unknown
    #[must_use]
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// A single planned activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    /// Free-form time of day, empty when the model gave none
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location_label: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

impl Activity {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: String::new(),
            location_label: String::new(),
            coordinates: None,
            estimated_cost: None,
        }
    }

    /// One-line summary used by the text view and the PDF
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = String::new();
        if !self.time.is_empty() {
            line.push_str(&self.time);
            line.push_str(" - ");
        }
        line.push_str(&self.name);
        if !self.location_label.is_empty() && self.location_label != self.name {
            line.push_str(" @ ");
            line.push_str(&self.location_label);
        }
        if let Some(cost) = self.estimated_cost {
            line.push_str(&format!(" (~${cost:.0})"));
        }
        line
    }
}

/// Activities planned for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day number
    pub day: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl DayPlan {
    #[must_use]
    pub fn empty(day: u32) -> Self {
        Self {
            day,
            title: None,
            activities: Vec::new(),
        }
    }

    #[must_use]
    pub fn heading(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => format!("Day {}: {}", self.day, title),
            _ => format!("Day {}", self.day),
        }
    }
}

/// One line of the cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub category: String,
    /// `None` when the category only has a total
    #[serde(default)]
    pub item: Option<String>,
    pub amount: f64,
}

/// Structured multi-day travel plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub destination: String,
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub cost_breakdown: Vec<CostItem>,
}

impl Itinerary {
    /// All activities in day order
    pub fn activities(&self) -> impl Iterator<Item = (&DayPlan, &Activity)> {
        self.days
            .iter()
            .flat_map(|day| day.activities.iter().map(move |activity| (day, activity)))
    }

    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }

    /// Sum of the cost breakdown, if there is one
    #[must_use]
    pub fn total_cost(&self) -> Option<f64> {
        if self.cost_breakdown.is_empty() {
            None
        } else {
            Some(self.cost_breakdown.iter().map(|item| item.amount).sum())
        }
    }
}
