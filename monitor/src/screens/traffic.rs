//! Traffic screen: congestion points filtered to the user's surroundings,
//! with the service reviews shown alongside them.

use floodnet::models::{Coordinate, Review, RiskBucket};
use floodnet::{ApiError, Client};

use super::Screen;
use crate::geo;
use crate::render;

/// A congestion report point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficPoint {
    pub id: i64,
    pub coordinate: Coordinate,
    pub level: RiskBucket,
}

/// The congestion feed is not live yet; these are the fixed pilot-region
/// points the screen ships with.
pub fn demo_traffic() -> Vec<TrafficPoint> {
    vec![
        TrafficPoint {
            id: 1,
            coordinate: Coordinate::new(20.5937, 78.9629),
            level: RiskBucket::High,
        },
        TrafficPoint {
            id: 2,
            coordinate: Coordinate::new(20.7, 78.97),
            level: RiskBucket::Medium,
        },
        TrafficPoint {
            id: 3,
            coordinate: Coordinate::new(20.65, 79.0),
            level: RiskBucket::Low,
        },
    ]
}

/// What the traffic screen shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficView {
    pub nearby: Vec<TrafficPoint>,
    pub reviews: Vec<Review>,
}

pub struct TrafficScreen {
    center: Coordinate,
    radius_km: f64,
}

impl TrafficScreen {
    pub fn new(center: Coordinate, radius_km: f64) -> Self {
        TrafficScreen { center, radius_km }
    }
}

impl Screen for TrafficScreen {
    type Data = TrafficView;

    fn title(&self) -> &'static str {
        "Traffic"
    }

    async fn fetch(&mut self, api: &Client) -> Result<Self::Data, ApiError> {
        let reviews = api.reviews().await?;
        let nearby = geo::nearby(self.center, self.radius_km, demo_traffic(), |point| {
            point.coordinate
        });
        Ok(TrafficView { nearby, reviews })
    }

    fn present(&self, data: &Self::Data) -> String {
        let mut block = render::traffic(&data.nearby);
        block.push_str("  Reviews:\n");
        block.push_str(&render::reviews(&data.reviews));
        block
    }
}
