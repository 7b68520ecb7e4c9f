//! Wire types for the FloodNet backend, plus the response-shape
//! normalization every consumer relies on.
//!
//! The backend grew screen by screen and its endpoints disagree on shape:
//! some return bare arrays, one wraps its payload in a `data` envelope, and
//! the zone feed is a JSON mapping keyed by zone name. The helpers here fold
//! all of those into plain vectors so callers never see the differences.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }
}

/// Severity bucket used across the monitoring surfaces.
///
/// The backend is inconsistent about casing (`"low"` from the vulnerability
/// feed, `"LOW"` from the flood-risk feed), so both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBucket {
    #[serde(alias = "LOW")]
    Low,
    #[serde(alias = "MEDIUM")]
    Medium,
    #[serde(alias = "HIGH")]
    High,
}

impl RiskBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBucket::Low => "low",
            RiskBucket::Medium => "medium",
            RiskBucket::High => "high",
        }
    }
}

impl std::fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-zone measurements as they appear in the `zone-flow-weather/` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ZoneInfo {
    pub lat: f64,
    pub lon: f64,
    /// Rain over the last hour at the zone itself, in millimeters.
    pub rain_1h: f64,
    pub upstream_rain: f64,
    pub downstream_rain: f64,
}

/// A zone row after the name-keyed mapping has been flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneReading {
    pub zone: String,
    pub coordinate: Coordinate,
    pub rain_1h: f64,
    pub upstream_rain: f64,
    pub downstream_rain: f64,
}

impl ZoneReading {
    /// Local plus upstream rain, the quantity the zone severity policy
    /// buckets on. Downstream rain is reported but does not feed the bucket.
    pub fn rain_sum(&self) -> f64 {
        self.rain_1h + self.upstream_rain
    }
}

/// Flattens the zone mapping into rows, one per named zone.
///
/// Row order is the document order of the mapping, which is how the backend
/// communicates its display order. Do not sort here.
pub fn zone_rows(zones: IndexMap<String, ZoneInfo>) -> Vec<ZoneReading> {
    zones
        .into_iter()
        .map(|(zone, info)| ZoneReading {
            zone,
            coordinate: Coordinate::new(info.lat, info.lon),
            rain_1h: info.rain_1h,
            upstream_rain: info.upstream_rain,
            downstream_rain: info.downstream_rain,
        })
        .collect()
}

/// One water-level sensor sample from `data/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorReading {
    pub id: i64,
    /// Water level in centimeters.
    pub water_level: f64,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Orders sensor samples newest first. Ties keep their fetched order.
pub fn sort_newest_first(readings: &mut [SensorReading]) {
    readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// One forecast point from `flood_risk/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FloodPoint {
    pub lat: f64,
    pub lon: f64,
    /// Forecast rainfall at the point, in millimeters.
    pub rain_mm: f64,
    pub risk: RiskBucket,
    /// Model confidence for `risk`, as a percentage.
    pub risk_prob: f64,
    #[serde(default)]
    pub notes: Vec<String>,
    /// Human-readable place name, filled in by reverse geocoding after the
    /// fetch. Never on the wire.
    #[serde(skip)]
    pub resolved_name: Option<String>,
}

impl FloodPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// The `flood_risk/` payload. Alone among the endpoints it wraps its array
/// in an envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct FloodRiskEnvelope {
    pub data: Vec<FloodPoint>,
}

/// A monitored hotspot from `vulnerability-points/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VulnerabilityPoint {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub risk_level: RiskBucket,
}

/// Current rainfall at a queried position, from `realtime-rainfall/`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RainfallSample {
    pub lat: f64,
    pub lon: f64,
    pub rainfall_mm: f64,
}

impl RainfallSample {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// A promotional banner from `sliders/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Slider {
    pub id: i64,
    pub title: String,
    /// URL of the banner image.
    pub image: String,
}

/// A user review from `reviews/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    pub id: i64,
    pub comment: String,
    /// URL of an attached photo, if one was uploaded.
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Attachment for a new review, already read into memory.
#[derive(Debug, Clone)]
pub struct ReviewImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The currently active UI theme, from `theme/active/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActiveTheme {
    pub name: String,
}

/// One year of monthly rainfall totals from `historical-rainfall/`.
///
/// Month field names mirror the backend's columns, abbreviated spellings
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct YearlyRainfall {
    pub year: i32,
    pub jan: f64,
    pub feb: f64,
    pub mar: f64,
    pub apr: f64,
    pub may: f64,
    pub june: f64,
    pub july: f64,
    pub aug: f64,
    pub sept: f64,
    pub oct: f64,
    pub nov: f64,
    pub dec: f64,
    pub total: f64,
}

impl YearlyRainfall {
    /// Monthly totals as a January-first array.
    pub fn monthly(&self) -> [f64; 12] {
        [
            self.jan, self.feb, self.mar, self.apr, self.may, self.june, self.july, self.aug,
            self.sept, self.oct, self.nov, self.dec,
        ]
    }
}

/// Body for `customer-location/`, the periodic presence report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerLocation {
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// Body for `bookings/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub user_id: i64,
    pub service_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}
