//! Nearby hospital lookup against the Google Places nearby-search API.

use log::{ info, warn };
use serde_json::Value as JsonValue;
use crate::error::{ ApiError, ApiResult };

const SEARCH_RADIUS_METERS: u32 = 5000;
const PLACE_CATEGORY: &str = "hospital";
const NEARBY_SEARCH_ROUTE: &str = "/maps/api/place/nearbysearch/json";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Parses raw query values, rejecting anything missing, non-finite or out of range.
    pub fn parse(lat: Option<&str>, lng: Option<&str>) -> ApiResult<Self> {
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) if !lat.trim().is_empty() && !lng.trim().is_empty() =>
                (lat, lng),
            _ => {
                return Err(ApiError::InvalidArgument("Latitude and longitude are required".into()));
            }
        };
        let lat = parse_finite(lat)?;
        let lng = parse_finite(lng)?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ApiError::InvalidArgument("Coordinates out of range".into()));
        }
        Ok(Self { lat, lng })
    }
}

fn parse_finite(raw: &str) -> ApiResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::InvalidArgument("Invalid latitude or longitude".into()))
}

pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PlacesClient {
    pub fn new(http: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        if api_key.is_none() {
            warn!("Places API key not configured; hospital search will fail");
        }
        Self { http, base_url, api_key }
    }

    /// Searches for hospitals around `coords` and returns the provider payload untouched.
    pub async fn nearby_hospitals(&self, coords: Coordinates) -> ApiResult<JsonValue> {
        let api_key = self.api_key
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("Places API key is not configured".into()))?;

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), NEARBY_SEARCH_ROUTE);
        let location = format!("{},{}", coords.lat, coords.lng);
        let radius = SEARCH_RADIUS_METERS.to_string();
        info!("Searching hospitals near {} (radius {}m)", location, radius);

        let resp = self.http
            .get(&url)
            .query(
                &[
                    ("location", location.as_str()),
                    ("radius", radius.as_str()),
                    ("type", PLACE_CATEGORY),
                    ("key", api_key),
                ]
            )
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Places provider answered {}", status);
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            });
        }
        Ok(resp.json::<JsonValue>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundaries() {
        let c = Coordinates::parse(Some("-90"), Some("180")).unwrap();
        assert_eq!(c, Coordinates { lat: -90.0, lng: 180.0 });
        assert!(Coordinates::parse(Some(" 12.97 "), Some("77.59")).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        for (lat, lng) in [("90.0001", "0"), ("-91", "0"), ("0", "180.5"), ("0", "-181")] {
            let err = Coordinates::parse(Some(lat), Some(lng)).unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument(_)), "{} {}", lat, lng);
        }
    }

    #[test]
    fn rejects_missing_and_non_numeric() {
        assert!(matches!(Coordinates::parse(None, Some("1")), Err(ApiError::InvalidArgument(_))));
        assert!(matches!(Coordinates::parse(Some(""), Some("1")), Err(ApiError::InvalidArgument(_))));
        assert!(matches!(Coordinates::parse(Some("abc"), Some("1")), Err(ApiError::InvalidArgument(_))));
        assert!(matches!(Coordinates::parse(Some("NaN"), Some("1")), Err(ApiError::InvalidArgument(_))));
        assert!(matches!(Coordinates::parse(Some("inf"), Some("1")), Err(ApiError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let client = PlacesClient::new(reqwest::Client::new(), "http://127.0.0.1:9".into(), None);
        let err = client
            .nearby_hospitals(Coordinates { lat: 1.0, lng: 2.0 }).await
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }
}
