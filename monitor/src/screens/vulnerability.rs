//! Hotspot screen: the monitored vulnerable places, each joined with the
//! rain falling on it right now.
//!
//! The join is keyed on the coordinates the rainfall endpoint echoes back,
//! never on response order. The queries run in parallel and complete in
//! whatever order the network feels like; a hotspot whose query failed
//! simply reads as dry.

use std::collections::HashMap;

use floodnet::models::{RainfallSample, VulnerabilityPoint};
use floodnet::{ApiError, Client};
use tokio::task::JoinSet;
use tracing::debug;

use super::Screen;
use crate::geo;
use crate::render;

/// A hotspot with its current rainfall.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub point: VulnerabilityPoint,
    pub rainfall_mm: f64,
}

pub struct VulnerabilityScreen;

impl Screen for VulnerabilityScreen {
    type Data = Vec<Hotspot>;

    fn title(&self) -> &'static str {
        "Vulnerability Hotspots"
    }

    async fn fetch(&mut self, api: &Client) -> Result<Self::Data, ApiError> {
        let points = api.vulnerability_points().await?;
        let samples = sample_rainfall(api, &points).await;
        Ok(correlate(points, &samples))
    }

    fn present(&self, data: &Self::Data) -> String {
        render::hotspots(data)
    }
}

/// One rainfall query per hotspot, all in flight at once.
async fn sample_rainfall(api: &Client, points: &[VulnerabilityPoint]) -> Vec<RainfallSample> {
    let mut queries = JoinSet::new();
    for point in points {
        let api = api.clone();
        let at = point.coordinate;
        queries.spawn(async move { api.realtime_rainfall(at).await });
    }
    let mut samples = Vec::new();
    while let Some(joined) = queries.join_next().await {
        match joined {
            Ok(Ok(sample)) => samples.push(sample),
            Ok(Err(err)) => debug!(%err, "rainfall query failed, hotspot will read as dry"),
            Err(err) => debug!(%err, "rainfall query died"),
        }
    }
    samples
}

/// Joins hotspots to rainfall samples by echoed coordinates. Hotspots with
/// no matching sample get 0.0 mm.
pub fn correlate(points: Vec<VulnerabilityPoint>, samples: &[RainfallSample]) -> Vec<Hotspot> {
    let by_position: HashMap<(i64, i64), f64> = samples
        .iter()
        .map(|sample| (geo::coordinate_key(sample.coordinate()), sample.rainfall_mm))
        .collect();
    points
        .into_iter()
        .map(|point| {
            let rainfall_mm = by_position
                .get(&geo::coordinate_key(point.coordinate))
                .copied()
                .unwrap_or(0.0);
            Hotspot { point, rainfall_mm }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodnet::models::{Coordinate, RiskBucket};

    fn hotspot(id: i64, name: &str, lat: f64, lon: f64) -> VulnerabilityPoint {
        VulnerabilityPoint {
            id,
            name: name.to_owned(),
            coordinate: Coordinate::new(lat, lon),
            risk_level: RiskBucket::Medium,
        }
    }

    fn sample(lat: f64, lon: f64, rainfall_mm: f64) -> RainfallSample {
        RainfallSample {
            lat,
            lon,
            rainfall_mm,
        }
    }

    #[test]
    fn join_matches_by_position_not_order() {
        let points = vec![
            hotspot(1, "Old Bridge", 20.59, 78.96),
            hotspot(2, "Market", 20.70, 78.97),
        ];
        // Samples arrive in the reverse of the query order.
        let samples = vec![sample(20.70, 78.97, 8.0), sample(20.59, 78.96, 2.0)];
        let joined = correlate(points, &samples);
        assert_eq!(joined[0].point.name, "Old Bridge");
        assert_eq!(joined[0].rainfall_mm, 2.0);
        assert_eq!(joined[1].rainfall_mm, 8.0);
    }

    #[test]
    fn missing_samples_read_as_dry() {
        let points = vec![
            hotspot(1, "Old Bridge", 20.59, 78.96),
            hotspot(2, "Market", 20.70, 78.97),
        ];
        let samples = vec![sample(20.59, 78.96, 2.0)];
        let joined = correlate(points, &samples);
        assert_eq!(joined[0].rainfall_mm, 2.0);
        assert_eq!(joined[1].rainfall_mm, 0.0);
    }

    #[test]
    fn float_echo_noise_still_matches() {
        let points = vec![hotspot(1, "Old Bridge", 20.59, 78.96)];
        let samples = vec![sample(20.59 + 1e-9, 78.96 - 1e-9, 4.5)];
        let joined = correlate(points, &samples);
        assert_eq!(joined[0].rainfall_mm, 4.5);
    }
}
