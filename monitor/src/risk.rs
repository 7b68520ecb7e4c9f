//! Severity bucketing and the display colors hung off it.
//!
//! Two threshold policies live here and they are not the same rule: zone
//! surfaces bucket on combined local-plus-upstream rain, sensor surfaces on
//! absolute water level. The cutoffs were tuned separately in production;
//! keep the policies separate even though the shapes rhyme.

use floodnet::models::RiskBucket;

/// Buckets combined local + upstream rain, in millimeters.
pub fn rain_sum_bucket(rain_sum_mm: f64) -> RiskBucket {
    if rain_sum_mm > 10.0 {
        RiskBucket::High
    } else if rain_sum_mm > 5.0 {
        RiskBucket::Medium
    } else {
        RiskBucket::Low
    }
}

/// Buckets an absolute water level, in centimeters.
pub fn water_level_bucket(level_cm: f64) -> RiskBucket {
    if level_cm > 80.0 {
        RiskBucket::High
    } else if level_cm > 50.0 {
        RiskBucket::Medium
    } else {
        RiskBucket::Low
    }
}

/// An RGBA display color. Alpha runs 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba::new(r, g, b, 1.0)
    }

    /// CSS-style `rgba(...)` string, as the map layers expect.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Marker color for a zone pin.
pub fn marker_color(bucket: RiskBucket) -> Rgba {
    match bucket {
        RiskBucket::High => Rgba::opaque(255, 0, 0),
        RiskBucket::Medium => Rgba::opaque(255, 255, 0),
        RiskBucket::Low => Rgba::opaque(0, 128, 0),
    }
}

/// Half-transparent overlay color for a traffic circle.
pub fn overlay_color(bucket: RiskBucket) -> Rgba {
    match bucket {
        RiskBucket::High => Rgba::new(255, 0, 0, 0.5),
        RiskBucket::Medium => Rgba::new(255, 255, 0, 0.5),
        RiskBucket::Low => Rgba::new(0, 255, 0, 0.5),
    }
}

/// Opacity of a hotspot circle: a 0.2 floor so dry hotspots stay visible,
/// rising with rainfall to a 0.7 ceiling so the map stays readable.
pub fn rain_alpha(rainfall_mm: f64) -> f64 {
    (0.2 + rainfall_mm / 20.0).clamp(0.2, 0.7)
}

/// Hotspot circle color: hue from the assessed risk level, opacity from the
/// rainfall falling on it right now.
pub fn hybrid_color(bucket: RiskBucket, rainfall_mm: f64) -> Rgba {
    let (r, g, b) = match bucket {
        RiskBucket::High => (255, 0, 0),
        RiskBucket::Medium => (255, 165, 0),
        RiskBucket::Low => (0, 200, 0),
    };
    Rgba::new(r, g, b, rain_alpha(rainfall_mm))
}

/// Radius of a hotspot circle, in meters: a 20 km base plus 1 km per
/// millimeter of current rainfall.
pub fn circle_radius_m(rainfall_mm: f64) -> f64 {
    20_000.0 + rainfall_mm * 1_000.0
}

/// Banner classification of a rainfall amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainfallStatus {
    Heavy,
    Moderate,
    Light,
    Dry,
}

impl RainfallStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RainfallStatus::Heavy => "Heavy Rainfall",
            RainfallStatus::Moderate => "Moderate Rainfall",
            RainfallStatus::Light => "Light Rainfall",
            RainfallStatus::Dry => "No Rain",
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            RainfallStatus::Heavy => Rgba::opaque(185, 28, 28),
            RainfallStatus::Moderate => Rgba::opaque(234, 179, 8),
            RainfallStatus::Light => Rgba::opaque(37, 99, 235),
            RainfallStatus::Dry => Rgba::opaque(22, 163, 74),
        }
    }
}

/// Classifies a rainfall amount for the forecast banner.
pub fn rainfall_status(rainfall_mm: f64) -> RainfallStatus {
    if rainfall_mm >= 20.0 {
        RainfallStatus::Heavy
    } else if rainfall_mm >= 5.0 {
        RainfallStatus::Moderate
    } else if rainfall_mm > 0.0 {
        RainfallStatus::Light
    } else {
        RainfallStatus::Dry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn rain_sum_boundaries_round_down() {
        assert_eq!(rain_sum_bucket(10.0), RiskBucket::Medium);
        assert_eq!(rain_sum_bucket(10.1), RiskBucket::High);
        assert_eq!(rain_sum_bucket(5.0), RiskBucket::Low);
        assert_eq!(rain_sum_bucket(5.1), RiskBucket::Medium);
        assert_eq!(rain_sum_bucket(0.0), RiskBucket::Low);
    }

    #[test]
    fn water_level_boundaries_round_down() {
        assert_eq!(water_level_bucket(80.0), RiskBucket::Medium);
        assert_eq!(water_level_bucket(80.5), RiskBucket::High);
        assert_eq!(water_level_bucket(50.0), RiskBucket::Low);
        assert_eq!(water_level_bucket(50.5), RiskBucket::Medium);
        assert_eq!(water_level_bucket(12.0), RiskBucket::Low);
    }

    #[test]
    fn alpha_is_clamped_to_its_band() {
        assert!(close(rain_alpha(0.0), 0.2));
        assert!(close(rain_alpha(4.0), 0.4));
        assert!(close(rain_alpha(10.0), 0.7));
        assert!(close(rain_alpha(250.0), 0.7));
    }

    #[test]
    fn hybrid_color_mixes_hue_and_rainfall() {
        let c = hybrid_color(RiskBucket::Medium, 0.0);
        assert_eq!((c.r, c.g, c.b), (255, 165, 0));
        assert!(close(c.a, 0.2));

        let heavy = hybrid_color(RiskBucket::High, 100.0);
        assert_eq!((heavy.r, heavy.g, heavy.b), (255, 0, 0));
        assert!(close(heavy.a, 0.7));
    }

    #[test]
    fn rainfall_status_banding() {
        assert_eq!(rainfall_status(20.0), RainfallStatus::Heavy);
        assert_eq!(rainfall_status(19.9), RainfallStatus::Moderate);
        assert_eq!(rainfall_status(5.0), RainfallStatus::Moderate);
        assert_eq!(rainfall_status(0.1), RainfallStatus::Light);
        assert_eq!(rainfall_status(0.0), RainfallStatus::Dry);
    }

    #[test]
    fn css_strings_match_the_map_layer_format() {
        assert_eq!(overlay_color(RiskBucket::Low).css(), "rgba(0,255,0,0.5)");
        assert_eq!(marker_color(RiskBucket::High).css(), "rgba(255,0,0,1)");
    }

    #[test]
    fn circle_radius_grows_with_rainfall() {
        assert_eq!(circle_radius_m(0.0), 20_000.0);
        assert_eq!(circle_radius_m(5.5), 25_500.0);
    }
}
