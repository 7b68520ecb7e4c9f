//! Runtime configuration, read once at startup from `MONITOR_*` environment
//! variables. Every field has a default, so an empty environment is valid;
//! the defaults point at a local backend and the Delhi pilot region.

use std::time::Duration;

use floodnet::models::Coordinate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the FloodNet backend API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User id attached to presence reports and bookings.
    #[serde(default = "default_user_id")]
    pub user_id: i64,

    /// Service id used when booking a visit.
    #[serde(default = "default_service_id")]
    pub service_id: i64,

    /// Fallback latitude when no location lookup is available.
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,

    /// Fallback longitude when no location lookup is available.
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,

    /// Half-width of the region shown around a fix, in degrees.
    #[serde(default = "default_span_deg")]
    pub default_span_deg: f64,

    /// Radius of the "nearby" filter on the traffic screen, in kilometers.
    #[serde(default = "default_nearby_radius_km")]
    pub nearby_radius_km: f64,

    /// Base URL of the Nominatim-compatible reverse geocoder.
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    #[serde(default = "default_zone_poll_secs")]
    pub zone_poll_secs: u64,

    #[serde(default = "default_sensor_poll_secs")]
    pub sensor_poll_secs: u64,

    /// Poll period of the hotspot screen, which also drives the per-point
    /// rainfall fan-out.
    #[serde(default = "default_rainfall_poll_secs")]
    pub rainfall_poll_secs: u64,

    #[serde(default = "default_flood_poll_secs")]
    pub flood_poll_secs: u64,

    /// Poll period of the traffic screen and its reviews.
    #[serde(default = "default_traffic_poll_secs")]
    pub traffic_poll_secs: u64,

    #[serde(default = "default_theme_poll_secs")]
    pub theme_poll_secs: u64,

    /// Period of the presence report pushed back to the backend.
    #[serde(default = "default_telemetry_secs")]
    pub telemetry_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_owned()
}

fn default_user_id() -> i64 {
    1
}

fn default_service_id() -> i64 {
    5
}

fn default_latitude() -> f64 {
    28.6139
}

fn default_longitude() -> f64 {
    77.2090
}

fn default_span_deg() -> f64 {
    0.01
}

fn default_nearby_radius_km() -> f64 {
    20.0
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_owned()
}

fn default_zone_poll_secs() -> u64 {
    300
}

fn default_sensor_poll_secs() -> u64 {
    60
}

fn default_rainfall_poll_secs() -> u64 {
    300
}

fn default_flood_poll_secs() -> u64 {
    600
}

fn default_traffic_poll_secs() -> u64 {
    600
}

fn default_theme_poll_secs() -> u64 {
    5
}

fn default_telemetry_secs() -> u64 {
    120
}

impl Config {
    /// Reads the configuration from `MONITOR_*` environment variables.
    pub fn read_env() -> Result<Self, envy::Error> {
        envy::prefixed("MONITOR_").from_env()
    }

    /// The configured fallback position.
    pub fn fallback_coordinate(&self) -> Coordinate {
        Coordinate::new(self.default_latitude, self.default_longitude)
    }

    pub fn zone_interval(&self) -> Duration {
        Duration::from_secs(self.zone_poll_secs)
    }

    pub fn sensor_interval(&self) -> Duration {
        Duration::from_secs(self.sensor_poll_secs)
    }

    pub fn rainfall_interval(&self) -> Duration {
        Duration::from_secs(self.rainfall_poll_secs)
    }

    pub fn flood_interval(&self) -> Duration {
        Duration::from_secs(self.flood_poll_secs)
    }

    pub fn traffic_interval(&self) -> Duration {
        Duration::from_secs(self.traffic_poll_secs)
    }

    pub fn theme_interval(&self) -> Duration {
        Duration::from_secs(self.theme_poll_secs)
    }

    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_secs(self.telemetry_secs)
    }
}
