//! Itinerary rendering for people: plain text and PDF

use crate::models::{Itinerary, TripRequest};

mod pdf;

pub use pdf::{PdfExporter, render_pdf};

/// A styled line of the rendered document
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line {
    Title(String),
    Heading(String),
    Subheading(String),
    Text(String),
    Bullet(String),
    /// Column titles of a table: category, item, amount
    TableHeader([String; 3]),
    TableRow([String; 3]),
    Blank,
}

/// Document outline shared by the text and PDF renderers
pub(crate) fn outline(request: &TripRequest, itinerary: &Itinerary) -> Vec<Line> {
    let destination = if itinerary.destination.is_empty() {
        &request.destination
    } else {
        &itinerary.destination
    };
    let interests = if request.interests.is_empty() {
        "-".to_string()
    } else {
        request.interests.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    let mut lines = vec![
        Line::Title(format!(
            "Your {}-Day Trip to {}",
            request.duration_days, destination
        )),
        Line::Blank,
        Line::Text(format!("Destination: {destination}")),
        Line::Text(format!("Days: {}", request.duration_days)),
        Line::Text(format!("Budget: ${}", request.format_budget())),
        Line::Text(format!("Interests: {interests}")),
        Line::Blank,
        Line::Heading("Daily Itinerary".to_string()),
    ];

    for day in &itinerary.days {
        lines.push(Line::Subheading(day.heading()));
        if day.activities.is_empty() {
            lines.push(Line::Text("Free day, nothing planned.".to_string()));
        }
        for activity in &day.activities {
            lines.push(Line::Bullet(activity.summary()));
        }
        lines.push(Line::Blank);
    }

    if !itinerary.cost_breakdown.is_empty() {
        lines.push(Line::Heading("Cost Breakdown".to_string()));
        lines.push(Line::TableHeader([
            "Category".to_string(),
            "Item".to_string(),
            "Amount".to_string(),
        ]));
        for cost in &itinerary.cost_breakdown {
            lines.push(Line::TableRow([
                title_case(&cost.category),
                cost.item
                    .as_deref()
                    .map_or_else(|| "Total".to_string(), title_case),
                format!("${:.2}", cost.amount),
            ]));
        }
        if let Some(total) = itinerary.total_cost() {
            lines.push(Line::Text(format!("Estimated total: ${total:.2}")));
        }
    }

    lines
}

/// Plain-text itinerary, as shown on screen and printed by the CLI
#[must_use]
pub fn render_text(request: &TripRequest, itinerary: &Itinerary) -> String {
    let mut out = String::new();
    for line in outline(request, itinerary) {
        match line {
            Line::Title(text) => {
                out.push_str(&text);
                out.push('\n');
                out.push_str(&"=".repeat(text.chars().count()));
            }
            Line::Heading(text) => {
                out.push_str(&text);
                out.push('\n');
                out.push_str(&"-".repeat(text.chars().count()));
            }
            Line::Subheading(text) => out.push_str(&format!("### {text}")),
            Line::Text(text) => out.push_str(&text),
            Line::Bullet(text) => out.push_str(&format!("  - {text}")),
            Line::TableHeader(_) => continue,
            Line::TableRow([category, item, amount]) => {
                out.push_str(&format!("  - {category} / {item}: {amount}"));
            }
            Line::Blank => {}
        }
        out.push('\n');
    }
    out
}

/// "local_transport" -> "Local Transport"
fn title_case(text: &str) -> String {
    text.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
