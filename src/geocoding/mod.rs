//! Free-text place name to coordinates.
//!
//! The query pipeline only sees the [`Geocoder`] trait; a network-backed
//! Nominatim client and an offline gazetteer implement it.

pub mod gazetteer;
pub mod nominatim;

pub use gazetteer::GazetteerGeocoder;
pub use nominatim::NominatimGeocoder;

use crate::error::Result;
use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub point: GeoPoint,
    pub display_name: Option<String>,
}

pub trait Geocoder {
    /// Resolve `text` to a location.
    ///
    /// `Ok(None)` means the name is unknown; `Err` means the lookup itself failed.
    fn resolve(&self, text: &str) -> Result<Option<GeocodedLocation>>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn resolve(&self, text: &str) -> Result<Option<GeocodedLocation>> {
        (**self).resolve(text)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn resolve(&self, text: &str) -> Result<Option<GeocodedLocation>> {
        (**self).resolve(text)
    }
}
