//! Map view built from an itinerary
//!
//! The browser draws the map with Leaflet; this module decides what goes on
//! it: one marker per activity with known coordinates, a center and a zoom
//! level that fits them, and the tile layer to draw underneath.

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, Itinerary};

/// Base map style; display only, never affects itinerary data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileLayer {
    #[default]
    Standard,
    Satellite,
    Dark,
}

impl TileLayer {
    pub const ALL: [TileLayer; 3] = [TileLayer::Standard, TileLayer::Satellite, TileLayer::Dark];

    #[must_use]
    pub fn url_template(self) -> &'static str {
        match self {
            TileLayer::Standard => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            TileLayer::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            TileLayer::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        }
    }

    #[must_use]
    pub fn attribution(self) -> &'static str {
        match self {
            TileLayer::Standard => "&copy; OpenStreetMap contributors",
            TileLayer::Satellite => "Tiles &copy; Esri",
            TileLayer::Dark => "&copy; OpenStreetMap contributors &copy; CARTO",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TileLayer::Standard => "Standard",
            TileLayer::Satellite => "Satellite",
            TileLayer::Dark => "Dark",
        }
    }
}

/// Tile layer description sent to the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerInfo {
    pub id: TileLayer,
    pub label: String,
    pub url_template: String,
    pub attribution: String,
}

impl From<TileLayer> for TileLayerInfo {
    fn from(layer: TileLayer) -> Self {
        Self {
            id: layer,
            label: layer.label().to_string(),
            url_template: layer.url_template().to_string(),
            attribution: layer.attribution().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub day: u32,
    pub name: String,
    pub coordinates: Coordinates,
    /// Popup text: day, time, place and cost
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// `None` when no activity has coordinates
    pub center: Option<Coordinates>,
    pub zoom: u8,
    pub tile_layer: TileLayerInfo,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    /// Place a marker for every activity that has coordinates
    #[must_use]
    pub fn from_itinerary(itinerary: &Itinerary, tile_layer: TileLayer) -> Self {
        let markers: Vec<MapMarker> = itinerary
            .activities()
            .filter_map(|(day, activity)| {
                let coordinates = activity.coordinates?;
                let mut popup = format!("Day {}", day.day);
                if !activity.time.is_empty() {
                    popup.push_str(&format!(" · {}", activity.time));
                }
                popup.push_str(&format!(": {}", activity.name));
                if !activity.location_label.is_empty() {
                    popup.push_str(&format!(" ({})", activity.location_label));
                }
                if let Some(cost) = activity.estimated_cost {
                    popup.push_str(&format!(" ~${cost:.0}"));
                }
                Some(MapMarker {
                    day: day.day,
                    name: activity.name.clone(),
                    coordinates,
                    popup,
                })
            })
            .collect();

        let center = center_of(&markers);
        let zoom = center.map_or(2, |center| zoom_for(&center, &markers));

        Self {
            center,
            zoom,
            tile_layer: tile_layer.into(),
            markers,
        }
    }
}

fn center_of(markers: &[MapMarker]) -> Option<Coordinates> {
    if markers.is_empty() {
        return None;
    }
    let count = markers.len() as f64;
    let lat = markers.iter().map(|m| m.coordinates.lat).sum::<f64>() / count;
    let lon = markers.iter().map(|m| m.coordinates.lon).sum::<f64>() / count;
    Some(Coordinates { lat, lon })
}

/// Zoom that keeps the farthest marker on screen
fn zoom_for(center: &Coordinates, markers: &[MapMarker]) -> u8 {
    if markers.len() == 1 {
        return 12;
    }
    let spread_km = markers
        .iter()
        .map(|marker| distance_km(center, &marker.coordinates))
        .fold(0.0_f64, f64::max);

    match spread_km {
        d if d < 2.0 => 13,
        d if d < 5.0 => 12,
        d if d < 15.0 => 11,
        d if d < 40.0 => 10,
        d if d < 100.0 => 8,
        d if d < 300.0 => 7,
        d if d < 800.0 => 5,
        _ => 4,
    }
}

fn distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let from = HaversineLocation {
        latitude: from.lat,
        longitude: from.lon,
    };
    let to = HaversineLocation {
        latitude: to.lat,
        longitude: to.lon,
    };
    distance(from, to, Units::Kilometers)
}
