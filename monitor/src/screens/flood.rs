//! Flood forecast screen: risk points around the user's position, each
//! decorated with a reverse-geocoded place name.

use floodnet::models::{Coordinate, FloodPoint};
use floodnet::{ApiError, Client};
use tokio::task::JoinSet;

use super::Screen;
use crate::geocode::ReverseGeocoder;
use crate::render;

pub struct FloodScreen<G> {
    center: Coordinate,
    geocoder: G,
}

impl<G> FloodScreen<G> {
    pub fn new(center: Coordinate, geocoder: G) -> Self {
        FloodScreen { center, geocoder }
    }
}

impl<G> Screen for FloodScreen<G>
where
    G: ReverseGeocoder + Clone + Send + 'static,
{
    type Data = Vec<FloodPoint>;

    fn title(&self) -> &'static str {
        "Flood Forecast"
    }

    async fn fetch(&mut self, api: &Client) -> Result<Self::Data, ApiError> {
        let mut points = api.flood_risk(self.center).await?;
        resolve_names(&self.geocoder, &mut points).await;
        Ok(points)
    }

    fn present(&self, data: &Self::Data) -> String {
        render::flood(data)
    }
}

/// Fills in display names, one geocoder lookup per point, all in flight at
/// once. A lookup that fails or composes to an empty address leaves the
/// name unset, and the card falls back to its coordinate label.
pub async fn resolve_names<G>(geocoder: &G, points: &mut [FloodPoint])
where
    G: ReverseGeocoder + Clone + Send + 'static,
{
    let mut lookups = JoinSet::new();
    for (index, point) in points.iter().enumerate() {
        let geocoder = geocoder.clone();
        let at = point.coordinate();
        lookups.spawn(async move { (index, geocoder.reverse(at).await) });
    }
    while let Some(joined) = lookups.join_next().await {
        if let Ok((index, Some(address))) = joined {
            let name = address.compose();
            if !name.is_empty() {
                points[index].resolved_name = Some(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{Address, FakeGeocoder, NullGeocoder};
    use floodnet::models::RiskBucket;

    fn point(lat: f64, lon: f64) -> FloodPoint {
        FloodPoint {
            lat,
            lon,
            rain_mm: 3.0,
            risk: RiskBucket::Low,
            risk_prob: 20.0,
            notes: vec![],
            resolved_name: None,
        }
    }

    #[tokio::test]
    async fn names_come_from_the_geocoder() {
        let geocoder = FakeGeocoder {
            address: Some(Address {
                city: Some("Indore".to_owned()),
                ..Address::default()
            }),
        };
        let mut points = vec![point(22.7, 75.8), point(22.8, 75.9)];
        resolve_names(&geocoder, &mut points).await;
        assert_eq!(points[0].resolved_name.as_deref(), Some("Indore"));
        assert_eq!(points[1].resolved_name.as_deref(), Some("Indore"));
    }

    #[tokio::test]
    async fn unresolved_points_keep_no_name() {
        let mut points = vec![point(22.7, 75.8)];
        resolve_names(&NullGeocoder, &mut points).await;
        assert_eq!(points[0].resolved_name, None);
    }

    #[tokio::test]
    async fn empty_addresses_do_not_become_names() {
        let geocoder = FakeGeocoder {
            address: Some(Address::default()),
        };
        let mut points = vec![point(22.7, 75.8)];
        resolve_names(&geocoder, &mut points).await;
        assert_eq!(points[0].resolved_name, None);
    }
}
