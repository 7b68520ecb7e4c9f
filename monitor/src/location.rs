//! Where the user is.
//!
//! Providers never fail: when a lookup is unavailable or comes back garbled
//! they degrade to the configured fallback region, marked as such, so the
//! screens always have a center to work from.

use floodnet::models::Coordinate;
use ipgeolocate::{Locator, Service};
use tracing::{info, warn};

use crate::config::Config;

/// How a fix was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixSource {
    /// A live lookup answered.
    Lookup,
    /// The configured default region stood in.
    Fallback,
}

/// A resolved position plus the span of the region to show around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    /// Half-width of the displayed region, in degrees.
    pub span_deg: f64,
    pub source: FixSource,
}

impl LocationFix {
    /// The fix for the configured fallback region.
    pub fn fallback(config: &Config) -> Self {
        LocationFix {
            coordinate: config.fallback_coordinate(),
            span_deg: config.default_span_deg,
            source: FixSource::Fallback,
        }
    }
}

/// A source of the user's position.
#[allow(async_fn_in_trait)]
pub trait LocationProvider {
    /// Resolve the current position. Must always yield a fix; providers
    /// degrade to a fallback instead of failing.
    async fn fix(&mut self) -> LocationFix;
}

/// Geolocates this machine from its public IP address via ip-api.com.
/// City-level accuracy at best, which is all the screens need.
pub struct IpLocation {
    fallback: LocationFix,
}

impl IpLocation {
    pub fn new(fallback: LocationFix) -> Self {
        IpLocation { fallback }
    }
}

impl LocationProvider for IpLocation {
    async fn fix(&mut self) -> LocationFix {
        match Locator::get("", Service::IpApi).await {
            Ok(found) => match parse_coordinate(&found.latitude, &found.longitude) {
                Some(coordinate) => {
                    info!(city = %found.city, region = %found.region, "located by IP");
                    LocationFix {
                        coordinate,
                        span_deg: self.fallback.span_deg,
                        source: FixSource::Lookup,
                    }
                }
                None => {
                    warn!(
                        lat = %found.latitude,
                        lon = %found.longitude,
                        "IP lookup answered with unparseable coordinates, using fallback region"
                    );
                    self.fallback
                }
            },
            Err(err) => {
                warn!(%err, "IP location lookup failed, using fallback region");
                self.fallback
            }
        }
    }
}

/// Always reports the configured region. Used when the operator pins the
/// monitor to a place, and when lookups are disabled.
pub struct FixedLocation {
    fix: LocationFix,
}

impl FixedLocation {
    pub fn new(fix: LocationFix) -> Self {
        FixedLocation { fix }
    }
}

impl LocationProvider for FixedLocation {
    async fn fix(&mut self) -> LocationFix {
        self.fix
    }
}

/// Either real provider, chosen at startup.
pub enum DeviceLocation {
    Ip(IpLocation),
    Fixed(FixedLocation),
}

impl LocationProvider for DeviceLocation {
    async fn fix(&mut self) -> LocationFix {
        match self {
            DeviceLocation::Ip(provider) => provider.fix().await,
            DeviceLocation::Fixed(provider) => provider.fix().await,
        }
    }
}

/// Reports a scripted fix. For tests.
pub struct FakeLocation {
    pub fix: LocationFix,
}

impl LocationProvider for FakeLocation {
    async fn fix(&mut self) -> LocationFix {
        self.fix
    }
}

/// The geolocation services report coordinates as strings.
fn parse_coordinate(latitude: &str, longitude: &str) -> Option<Coordinate> {
    let latitude = latitude.parse().ok()?;
    let longitude = longitude.parse().ok()?;
    Some(Coordinate::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_parse_only_when_both_halves_do() {
        let parsed = parse_coordinate("28.6139", "77.2090").unwrap();
        assert_eq!(parsed.latitude, 28.6139);
        assert_eq!(parsed.longitude, 77.2090);
        assert!(parse_coordinate("28.6139", "east").is_none());
        assert!(parse_coordinate("", "77.2090").is_none());
    }

    #[tokio::test]
    async fn fixed_provider_reports_its_region() {
        let fix = LocationFix {
            coordinate: Coordinate::new(20.5937, 78.9629),
            span_deg: 0.01,
            source: FixSource::Fallback,
        };
        let mut provider = FixedLocation::new(fix);
        assert_eq!(provider.fix().await, fix);
    }

    #[tokio::test]
    async fn fake_provider_is_scripted() {
        let fix = LocationFix {
            coordinate: Coordinate::new(1.0, 2.0),
            span_deg: 0.5,
            source: FixSource::Lookup,
        };
        let mut provider = FakeLocation { fix };
        assert_eq!(provider.fix().await.coordinate.latitude, 1.0);
    }
}
