use std::time::Duration;

use serde::Deserialize;

use crate::geolocation::domain::geolocator::{Coordinates, Geolocator};

const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// IP-based position lookup over HTTP.
///
/// Every failure mode (network, non-success status, malformed body) is
/// logged and reported as an unknown position. The pipeline only calls
/// this once per snapshot epoch, so no response caching is needed.
pub struct IpApiGeolocator {
    client: reqwest::blocking::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

impl IpApiGeolocator {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn fetch(&self) -> Result<Coordinates, Box<dyn std::error::Error>> {
        let body: IpApiResponse = self
            .client
            .get(&self.endpoint)
            .send()?
            .error_for_status()?
            .json()?;
        parse_response(body)
    }
}

impl Default for IpApiGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Geolocator for IpApiGeolocator {
    fn locate(&mut self) -> Option<Coordinates> {
        match self.fetch() {
            Ok(coords) => Some(coords),
            Err(e) => {
                log::warn!("geolocation lookup failed: {e}");
                None
            }
        }
    }
}

fn parse_response(body: IpApiResponse) -> Result<Coordinates, Box<dyn std::error::Error>> {
    if body.status != "success" {
        return Err(format!("lookup status {:?}", body.status).into());
    }
    Ok(Coordinates {
        lat: body.lat,
        lon: body.lon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Coordinates, Box<dyn std::error::Error>> {
        let body: IpApiResponse = serde_json::from_str(json)?;
        parse_response(body)
    }

    #[test]
    fn test_parses_successful_lookup() {
        let coords =
            parse(r#"{"status": "success", "lat": 51.5074, "lon": -0.1278}"#).unwrap();
        assert_eq!(
            coords,
            Coordinates {
                lat: 51.5074,
                lon: -0.1278
            }
        );
    }

    #[test]
    fn test_failed_status_is_an_error() {
        assert!(parse(r#"{"status": "fail", "message": "private range"}"#).is_err());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(parse("not json at all").is_err());
    }

    #[test]
    fn test_unreachable_endpoint_reports_unknown() {
        // Reserved TEST-NET address: the request fails fast, locate degrades
        let mut geo = IpApiGeolocator::with_endpoint("http://192.0.2.1/json/");
        assert_eq!(geo.locate(), None);
    }
}
