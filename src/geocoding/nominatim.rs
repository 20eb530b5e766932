use crate::config::GeocoderSettings;
use crate::error::{QueryError, Result};
use crate::geocoding::{GeocodedLocation, Geocoder};
use crate::models::GeoPoint;
use crate::utils::coordinates::parse_coordinate;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// One entry of a Nominatim `/search?format=jsonv2` response.
/// Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Blocking client for an OpenStreetMap Nominatim endpoint.
///
/// Only the best match is requested; no retry, throttling or caching is done
/// here, so callers sharing the public endpoint must respect its usage policy.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.endpoint)
    }
}

impl Geocoder for NominatimGeocoder {
    fn resolve(&self, text: &str) -> Result<Option<GeocodedLocation>> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(None);
        }

        debug!("Nominatim lookup for '{}' via {}", query, self.endpoint);
        let body = self
            .client
            .get(self.search_url())
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .text()?;

        let location = parse_search_response(&body)?;
        match &location {
            Some(found) => info!(
                "Geocoded '{}' to ({:.5}, {:.5})",
                query, found.point.latitude, found.point.longitude
            ),
            None => info!("Nominatim has no match for '{}'", query),
        }
        Ok(location)
    }
}

/// First place of a search response; an empty array means no match.
fn parse_search_response(body: &str) -> Result<Option<GeocodedLocation>> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude = parse_coordinate(&place.lat)?;
    let longitude = parse_coordinate(&place.lon)?;
    let point = GeoPoint::new(latitude, longitude).map_err(|e| {
        QueryError::InvalidCoordinate(format!("Nominatim returned {}: {}", place.lat, e))
    })?;

    Ok(Some(GeocodedLocation {
        point,
        display_name: place.display_name,
    }))
}
