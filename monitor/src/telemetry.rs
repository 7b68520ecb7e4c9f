//! Pushing the user's presence back to the backend, and booking visits.
//!
//! A presence report is a resolved fix decorated with a display address.
//! Failures are logged and the next period tries again; there is no retry
//! within a period.

use floodnet::models::{Booking, CustomerLocation};
use floodnet::{ApiError, Client};

use crate::config::Config;
use crate::geocode::{display_address, ReverseGeocoder};
use crate::location::{LocationFix, LocationProvider};

/// Resolves a fix and its display address in one go.
pub async fn locate<P, G>(provider: &mut P, geocoder: &G) -> (LocationFix, String)
where
    P: LocationProvider,
    G: ReverseGeocoder,
{
    let fix = provider.fix().await;
    let address = display_address(
        geocoder.reverse(fix.coordinate).await.as_ref(),
        fix.coordinate,
    );
    (fix, address)
}

/// Resolves a fresh fix and posts one presence report.
pub async fn report_once<P, G>(
    api: &Client,
    config: &Config,
    provider: &mut P,
    geocoder: &G,
) -> Result<(), ApiError>
where
    P: LocationProvider,
    G: ReverseGeocoder,
{
    let (fix, address) = locate(provider, geocoder).await;
    let record = CustomerLocation {
        user_id: config.user_id,
        latitude: fix.coordinate.latitude,
        longitude: fix.coordinate.longitude,
        address,
    };
    api.report_location(&record).await
}

/// Books a service visit at the given position. Returns the stored booking
/// as the backend echoed it.
pub async fn book_service(
    api: &Client,
    config: &Config,
    fix: &LocationFix,
    address: &str,
) -> Result<serde_json::Value, ApiError> {
    let booking = Booking {
        user_id: config.user_id,
        service_id: config.service_id,
        latitude: fix.coordinate.latitude,
        longitude: fix.coordinate.longitude,
        address: address.to_owned(),
    };
    api.create_booking(&booking).await
}
