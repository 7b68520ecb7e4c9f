//! Text presentation of the monitoring surfaces.
//!
//! Each helper renders one surface into a block of lines for the console
//! front-ends to print. Nothing here touches the network or the clock, so
//! the blocks are directly assertable in tests.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use floodnet::models::{
    FloodPoint, Review, RiskBucket, SensorReading, Slider, YearlyRainfall, ZoneReading,
};

use crate::geocode;
use crate::location::{FixSource, LocationFix};
use crate::risk;
use crate::screens::traffic::TrafficPoint;
use crate::screens::vulnerability::Hotspot;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Section header, with the refresh time when there has been one.
pub fn section(title: &str, updated: Option<DateTime<Utc>>) -> String {
    match updated {
        Some(at) => format!("==== {title} (as of {}) ====\n", at.format("%H:%M:%S UTC")),
        None => format!("==== {title} ====\n"),
    }
}

/// Announces a theme switch.
pub fn theme_line(name: &str) -> String {
    format!("Theme: {name}\n")
}

/// The location bar shown above the screens.
pub fn location_line(fix: &LocationFix, address: &str) -> String {
    match fix.source {
        FixSource::Lookup => format!("Location: {address}\n"),
        FixSource::Fallback => format!("Location: {address} [fallback region]\n"),
    }
}

pub fn sliders(banners: &[Slider]) -> String {
    let mut out = String::new();
    for banner in banners {
        let _ = writeln!(out, "  {}", banner.title);
    }
    out
}

/// Zone rows with their buckets and marker colors, in backend order.
pub fn zones(rows: &[ZoneReading]) -> String {
    if rows.is_empty() {
        return "  no zones on record\n".to_owned();
    }
    let mut out = String::new();
    for row in rows {
        let bucket = risk::rain_sum_bucket(row.rain_sum());
        let _ = writeln!(
            out,
            "  [{}] {}: {:.1} mm (local {:.1} + upstream {:.1}), downstream {:.1} mm, marker {}",
            bucket,
            row.zone,
            row.rain_sum(),
            row.rain_1h,
            row.upstream_rain,
            row.downstream_rain,
            risk::marker_color(bucket).css(),
        );
    }
    out
}

/// Sensor rows, one per sample, in the order given (the fetch already
/// sorted them newest first).
pub fn sensors(readings: &[SensorReading]) -> String {
    if readings.is_empty() {
        return "  no sensor data on record\n".to_owned();
    }
    let mut out = String::new();
    for reading in readings {
        let _ = writeln!(
            out,
            "  #{} {}: {:.0} cm [{}] at {}",
            reading.id,
            reading.location,
            reading.water_level,
            risk::water_level_bucket(reading.water_level),
            reading.timestamp.format("%Y-%m-%d %H:%M UTC"),
        );
    }
    out
}

/// Forecast cards, one per flood point.
pub fn flood(points: &[FloodPoint]) -> String {
    if points.is_empty() {
        return "  no forecast points on record\n".to_owned();
    }
    let mut out = String::new();
    for point in points {
        let name = point
            .resolved_name
            .clone()
            .unwrap_or_else(|| geocode::coordinate_label(point.coordinate()));
        let status = risk::rainfall_status(point.rain_mm);
        let _ = writeln!(out, "  {name}");
        let _ = writeln!(
            out,
            "    {} ({:.1} mm expected) {}",
            status.label(),
            point.rain_mm,
            status.color().css(),
        );
        let _ = writeln!(
            out,
            "    risk {} ({:.0}% confidence)",
            point.risk.as_str().to_uppercase(),
            point.risk_prob,
        );
        for note in &point.notes {
            let _ = writeln!(out, "    - {note}");
        }
    }
    out
}

/// Hotspot rows with their rainfall-weighted circles.
pub fn hotspots(spots: &[Hotspot]) -> String {
    if spots.is_empty() {
        return "  no hotspots on record\n".to_owned();
    }
    let mut out = String::new();
    for spot in spots {
        let _ = writeln!(
            out,
            "  {}: risk {}, rain {:.1} mm, circle {:.0} m {}",
            spot.point.name,
            spot.point.risk_level,
            spot.rainfall_mm,
            risk::circle_radius_m(spot.rainfall_mm),
            risk::hybrid_color(spot.point.risk_level, spot.rainfall_mm).css(),
        );
    }
    out
}

/// The traffic legend plus the points that survived the nearby filter.
pub fn traffic(points: &[TrafficPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  legend: high {}, medium {}, low {}",
        risk::overlay_color(RiskBucket::High).css(),
        risk::overlay_color(RiskBucket::Medium).css(),
        risk::overlay_color(RiskBucket::Low).css(),
    );
    if points.is_empty() {
        let _ = writeln!(out, "  no congestion points nearby");
        return out;
    }
    for point in points {
        let _ = writeln!(
            out,
            "  #{} ({:.4}, {:.4}): {} traffic {}",
            point.id,
            point.coordinate.latitude,
            point.coordinate.longitude,
            point.level,
            risk::overlay_color(point.level).css(),
        );
    }
    out
}

pub fn reviews(entries: &[Review]) -> String {
    if entries.is_empty() {
        return "  no reviews yet\n".to_owned();
    }
    let mut out = String::new();
    for review in entries {
        let _ = writeln!(
            out,
            "  [{}] {}",
            review.created_at.format("%Y-%m-%d"),
            review.comment,
        );
        if let Some(image) = &review.image {
            let _ = writeln!(out, "    photo: {image}");
        }
    }
    out
}

/// Yearly rainfall, one year per block with a calendar line.
pub fn history(years: &[YearlyRainfall]) -> String {
    if years.is_empty() {
        return "  no rainfall history on record\n".to_owned();
    }
    let mut out = String::new();
    for year in years {
        let _ = writeln!(out, "  {}: total {:.1} mm", year.year, year.total);
        let months = year
            .monthly()
            .iter()
            .zip(MONTHS)
            .map(|(amount, month)| format!("{month} {amount:.1}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "    {months}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use floodnet::models::{Coordinate, RiskBucket};

    fn reading(location: &str, level: f64) -> SensorReading {
        SensorReading {
            id: 1,
            water_level: level,
            location: location.to_owned(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn zone_lines_carry_bucket_and_marker() {
        let rows = vec![ZoneReading {
            zone: "Zone A".to_owned(),
            coordinate: Coordinate::new(20.0, 78.0),
            rain_1h: 9.0,
            upstream_rain: 3.0,
            downstream_rain: 1.0,
        }];
        let block = zones(&rows);
        assert!(block.contains("[high] Zone A: 12.0 mm"));
        assert!(block.contains("marker rgba(255,0,0,1)"));
    }

    #[test]
    fn empty_surfaces_say_so() {
        assert_eq!(zones(&[]), "  no zones on record\n");
        assert_eq!(sensors(&[]), "  no sensor data on record\n");
        assert!(traffic(&[]).contains("no congestion points nearby"));
    }

    #[test]
    fn sensor_lines_keep_input_order() {
        let block = sensors(&[reading("T3", 90.0), reading("T1", 40.0)]);
        let t3 = block.find("T3").unwrap();
        let t1 = block.find("T1").unwrap();
        assert!(t3 < t1);
        assert!(block.contains("90 cm [high]"));
        assert!(block.contains("40 cm [low]"));
    }

    #[test]
    fn flood_cards_prefer_resolved_names() {
        let mut point = FloodPoint {
            lat: 28.61,
            lon: 77.21,
            rain_mm: 12.0,
            risk: RiskBucket::High,
            risk_prob: 82.0,
            notes: vec!["river rising".to_owned()],
            resolved_name: None,
        };
        let block = flood(std::slice::from_ref(&point));
        assert!(block.contains("Lat: 28.6100, Lon: 77.2100"));
        assert!(block.contains("Moderate Rainfall (12.0 mm expected)"));
        assert!(block.contains("risk HIGH (82% confidence)"));
        assert!(block.contains("- river rising"));

        point.resolved_name = Some("Connaught Place, New Delhi".to_owned());
        let block = flood(std::slice::from_ref(&point));
        assert!(block.contains("Connaught Place, New Delhi"));
        assert!(!block.contains("Lat: 28.6100"));
    }

    #[test]
    fn history_uses_calendar_month_names() {
        let years = vec![YearlyRainfall {
            year: 2023,
            jan: 1.0,
            feb: 2.0,
            mar: 3.0,
            apr: 4.0,
            may: 5.0,
            june: 6.0,
            july: 7.0,
            aug: 8.0,
            sept: 9.0,
            oct: 10.0,
            nov: 11.0,
            dec: 12.0,
            total: 78.0,
        }];
        let block = history(&years);
        assert!(block.contains("2023: total 78.0 mm"));
        assert!(block.contains("Jun 6.0"));
        assert!(block.contains("Sep 9.0"));
    }

    #[test]
    fn header_shows_refresh_time_once_there_is_one() {
        assert_eq!(section("Zones", None), "==== Zones ====\n");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap();
        assert_eq!(
            section("Zones", Some(at)),
            "==== Zones (as of 09:30:05 UTC) ====\n"
        );
    }
}
