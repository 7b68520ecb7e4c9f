//! Client for the FloodNet flood and traffic monitoring backend.
//!
//! The backend is a small REST service with one endpoint per monitoring
//! surface. [`Client`] exposes one method per endpoint and hands back the
//! shapes from [`models`], already normalized: the zone mapping arrives as
//! ordered rows, sensor samples come back newest first, and the flood-risk
//! envelope is unwrapped. Callers decide what a failure means; the client
//! never retries.

use std::time::Duration;

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod models;

use models::{
    ActiveTheme, Booking, Coordinate, CustomerLocation, FloodPoint, FloodRiskEnvelope,
    RainfallSample, Review, ReviewImage, SensorReading, Slider, VulnerabilityPoint,
    YearlyRainfall, ZoneInfo, ZoneReading,
};

/// Per-request deadline. A hung backend must not stall the poll loops that
/// sit on top of this client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What went wrong talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, DNS, TLS, timeout.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    /// The response body did not match the expected shape.
    #[error("unreadable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// A review attachment could not be prepared for upload.
    #[error("could not attach {file_name}: {reason}")]
    Attachment { file_name: String, reason: String },
}

/// HTTP client bound to one backend base URL.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base: String,
}

impl Client {
    /// Creates a client for the backend at `base_url`, with or without a
    /// trailing slash.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_owned();
        Client {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }
        Ok(response)
    }

    /// Fetches the zone mapping and flattens it into rows in document order.
    pub async fn zone_flow_weather(&self) -> Result<Vec<ZoneReading>, ApiError> {
        let zones: indexmap::IndexMap<String, ZoneInfo> =
            self.get_json("zone-flow-weather/").await?;
        Ok(models::zone_rows(zones))
    }

    /// Fetches sensor samples, newest first.
    pub async fn sensor_readings(&self) -> Result<Vec<SensorReading>, ApiError> {
        let mut readings: Vec<SensorReading> = self.get_json("data/").await?;
        models::sort_newest_first(&mut readings);
        Ok(readings)
    }

    /// Fetches the monitored hotspots.
    pub async fn vulnerability_points(&self) -> Result<Vec<VulnerabilityPoint>, ApiError> {
        self.get_json("vulnerability-points/").await
    }

    /// Fetches current rainfall at one position.
    pub async fn realtime_rainfall(&self, at: Coordinate) -> Result<RainfallSample, ApiError> {
        let path = format!("realtime-rainfall/?lat={}&lon={}", at.latitude, at.longitude);
        self.get_json(&path).await
    }

    /// Fetches flood-risk forecast points around a position, with the
    /// backend's `data` envelope already unwrapped.
    pub async fn flood_risk(&self, around: Coordinate) -> Result<Vec<FloodPoint>, ApiError> {
        let path = format!("flood_risk/?lat={}&lon={}", around.latitude, around.longitude);
        let envelope: FloodRiskEnvelope = self.get_json(&path).await?;
        Ok(envelope.data)
    }

    /// Fetches the promotional banners.
    pub async fn sliders(&self) -> Result<Vec<Slider>, ApiError> {
        self.get_json("sliders/").await
    }

    /// Fetches user reviews.
    pub async fn reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get_json("reviews/").await
    }

    /// Submits a review, with an optional photo as a multipart attachment.
    /// Returns the stored review.
    pub async fn create_review(
        &self,
        comment: &str,
        image: Option<ReviewImage>,
    ) -> Result<Review, ApiError> {
        let url = self.endpoint("reviews/");
        debug!(%url, "POST multipart");
        let mut form = multipart::Form::new().text("comment", comment.to_owned());
        if let Some(image) = image {
            let mime = image_mime(&image.file_name);
            let part = multipart::Part::bytes(image.bytes)
                .file_name(image.file_name.clone())
                .mime_str(&mime)
                .map_err(|source| ApiError::Attachment {
                    file_name: image.file_name,
                    reason: source.to_string(),
                })?;
            form = form.part("image", part);
        }
        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }

    /// Deletes a review by id.
    pub async fn delete_review(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("reviews/{id}/"));
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }
        Ok(())
    }

    /// Reports the user's resolved position and address.
    pub async fn report_location(&self, record: &CustomerLocation) -> Result<(), ApiError> {
        self.post_json("customer-location/", record).await?;
        Ok(())
    }

    /// Books a service visit at the given position. Returns the stored
    /// booking as the backend sent it back.
    pub async fn create_booking(&self, booking: &Booking) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("bookings/");
        let response = self.post_json("bookings/", booking).await?;
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }

    /// Fetches the active UI theme.
    pub async fn active_theme(&self) -> Result<ActiveTheme, ApiError> {
        self.get_json("theme/active/").await
    }

    /// Fetches the per-year rainfall history.
    pub async fn historical_rainfall(&self) -> Result<Vec<YearlyRainfall>, ApiError> {
        self.get_json("historical-rainfall/").await
    }
}

/// Guesses a MIME type for an attachment from its file extension. `jpg`
/// maps to the registered `image/jpeg`.
pub fn image_mime(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            if ext == "jpg" {
                "image/jpeg".to_owned()
            } else {
                format!("image/{ext}")
            }
        }
        _ => "application/octet-stream".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let plain = Client::new("http://127.0.0.1:8000/api");
        let slashed = Client::new("http://127.0.0.1:8000/api/");
        assert_eq!(plain.endpoint("data/"), "http://127.0.0.1:8000/api/data/");
        assert_eq!(slashed.endpoint("data/"), "http://127.0.0.1:8000/api/data/");
    }

    #[test]
    fn image_mime_from_extension() {
        assert_eq!(image_mime("flood.png"), "image/png");
        assert_eq!(image_mime("IMG_2041.JPG"), "image/jpeg");
        assert_eq!(image_mime("scan.jpeg"), "image/jpeg");
        assert_eq!(image_mime("snapshot"), "application/octet-stream");
    }

    #[tokio::test]
    async fn delete_review_targets_the_review_path() {
        // Nothing listens on this port, so the request dies in transport
        // with the full URL in the error.
        let client = Client::new("http://127.0.0.1:1/api");
        let err = client.delete_review(7).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
        assert!(err.to_string().contains("/api/reviews/7/"));
    }
}
