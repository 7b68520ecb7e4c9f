//! Reverse geocoding of positions to display addresses.
//!
//! Addresses are decoration. Every caller has a coordinate-only label to
//! fall back on, so a geocoder that is down, rate limited, or confused
//! degrades to that label and never fails the fetch it decorates.

use std::future::Future;
use std::time::Duration;

use floodnet::models::Coordinate;
use serde::Deserialize;
use tracing::warn;

/// Nominatim's usage policy requires an identifying agent.
const USER_AGENT: &str = "floodnet-monitor/0.1";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Fragments of a postal address. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub name: Option<String>,
    pub street: Option<String>,
    pub subregion: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Joins the non-empty fragments with `", "`, most specific first.
    /// Blank and whitespace-only fragments are dropped, not joined.
    pub fn compose(&self) -> String {
        [
            &self.name,
            &self.street,
            &self.subregion,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|fragment| fragment.as_deref())
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// The label shown when no address is available.
pub fn coordinate_label(at: Coordinate) -> String {
    format!("Lat: {:.4}, Lon: {:.4}", at.latitude, at.longitude)
}

/// An address line for display: the composed address when there is one,
/// the coordinate label otherwise.
pub fn display_address(address: Option<&Address>, at: Coordinate) -> String {
    match address {
        Some(address) => {
            let composed = address.compose();
            if composed.is_empty() {
                coordinate_label(at)
            } else {
                composed
            }
        }
        None => coordinate_label(at),
    }
}

/// Turns a position into an address, best effort.
///
/// The returned future must be `Send`: the flood screen spawns one lookup
/// per point onto the runtime.
pub trait ReverseGeocoder {
    /// `None` means the lookup did not work out; callers fall back to
    /// [`coordinate_label`].
    fn reverse(&self, at: Coordinate) -> impl Future<Output = Option<Address>> + Send;
}

/// Reverse geocoder backed by a Nominatim-compatible service.
#[derive(Debug, Clone)]
pub struct Nominatim {
    http: reqwest::Client,
    base: String,
}

impl Nominatim {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Nominatim {
            http,
            base: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl ReverseGeocoder for Nominatim {
    async fn reverse(&self, at: Coordinate) -> Option<Address> {
        let url = format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}",
            self.base, at.latitude, at.longitude
        );
        let response = match self.http.get(&url).timeout(LOOKUP_TIMEOUT).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, "reverse geocode failed");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(status = %response.status(), "reverse geocode refused");
            return None;
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(%err, "reverse geocode failed");
                return None;
            }
        };
        match serde_json::from_str::<ReverseReply>(&body) {
            Ok(reply) => Some(reply.into_address()),
            Err(err) => {
                warn!(%err, "reverse geocode reply unreadable");
                None
            }
        }
    }
}

/// Never resolves anything; every caller shows coordinate labels. Used by
/// the one-shot report, which should not hold a fetch hostage to an
/// external geocoder.
#[derive(Debug, Clone, Copy)]
pub struct NullGeocoder;

impl ReverseGeocoder for NullGeocoder {
    async fn reverse(&self, _at: Coordinate) -> Option<Address> {
        None
    }
}

/// Replays a scripted answer. For tests.
#[derive(Debug, Clone)]
pub struct FakeGeocoder {
    pub address: Option<Address>,
}

impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(&self, _at: Coordinate) -> Option<Address> {
        self.address.clone()
    }
}

/// The interesting subset of a Nominatim `jsonv2` reverse reply.
#[derive(Debug, Default, Deserialize)]
struct ReverseReply {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: ReplyAddress,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyAddress {
    #[serde(default)]
    road: Option<String>,
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl ReverseReply {
    fn into_address(self) -> Address {
        let ReplyAddress {
            road,
            county,
            city,
            town,
            village,
            state,
            postcode,
            country,
        } = self.address;
        Address {
            name: self.name,
            street: road,
            subregion: county,
            // Nominatim reports exactly one of these, depending on the
            // place's size.
            city: city.or(town).or(village),
            region: state,
            postal_code: postcode,
            country,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_skips_missing_and_blank_fragments() {
        let address = Address {
            street: Some("MG Road".to_owned()),
            subregion: Some("".to_owned()),
            city: Some("Indore".to_owned()),
            ..Address::default()
        };
        assert_eq!(address.compose(), "MG Road, Indore");
    }

    #[test]
    fn compose_trims_whitespace_fragments() {
        let address = Address {
            street: Some("  ".to_owned()),
            city: Some("Indore".to_owned()),
            country: Some("India".to_owned()),
            ..Address::default()
        };
        assert_eq!(address.compose(), "Indore, India");
    }

    #[test]
    fn compose_of_nothing_is_empty() {
        assert_eq!(Address::default().compose(), "");
    }

    #[test]
    fn coordinate_label_pads_to_four_decimals() {
        let label = coordinate_label(Coordinate::new(28.6139, 77.209));
        assert_eq!(label, "Lat: 28.6139, Lon: 77.2090");
    }

    #[test]
    fn display_address_falls_back_to_the_label() {
        let at = Coordinate::new(20.5937, 78.9629);
        assert_eq!(display_address(None, at), "Lat: 20.5937, Lon: 78.9629");
        let empty = Address::default();
        assert_eq!(
            display_address(Some(&empty), at),
            "Lat: 20.5937, Lon: 78.9629"
        );
        let named = Address {
            city: Some("Nagpur".to_owned()),
            ..Address::default()
        };
        assert_eq!(display_address(Some(&named), at), "Nagpur");
    }

    #[test]
    fn nominatim_reply_maps_onto_address_fields() {
        let body = r#"{
            "name": "India Gate",
            "address": {
                "road": "Kartavya Path",
                "city": "New Delhi",
                "state": "Delhi",
                "postcode": "110001",
                "country": "India"
            }
        }"#;
        let reply: ReverseReply = serde_json::from_str(body).unwrap();
        let address = reply.into_address();
        assert_eq!(address.name.as_deref(), Some("India Gate"));
        assert_eq!(address.street.as_deref(), Some("Kartavya Path"));
        assert_eq!(address.city.as_deref(), Some("New Delhi"));
        assert_eq!(
            address.compose(),
            "India Gate, Kartavya Path, New Delhi, Delhi, 110001, India"
        );
    }

    #[test]
    fn nominatim_reply_uses_town_when_there_is_no_city() {
        let body = r#"{"address": {"town": "Khandwa", "state": "Madhya Pradesh"}}"#;
        let reply: ReverseReply = serde_json::from_str(body).unwrap();
        let address = reply.into_address();
        assert_eq!(address.city.as_deref(), Some("Khandwa"));
    }

    #[tokio::test]
    async fn null_geocoder_never_answers() {
        let at = Coordinate::new(0.0, 0.0);
        assert!(NullGeocoder.reverse(at).await.is_none());
    }
}
