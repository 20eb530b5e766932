use crate::config::QuerySettings;
use crate::error::{QueryError, Result};
use crate::geocoding::Geocoder;
use crate::models::{AverageResult, DistrictDataset, GeoPoint, ProximityReport, SelectedDistrict};
use crate::processors::Aggregator;
use crate::spatial::{check_neighbor_count, IndexStrategy};
use crate::utils::constants::{DEFAULT_LEAF_SIZE, DEFAULT_NEIGHBORS};
use tracing::{debug, info};

/// Answers "what are metal levels like near this place?".
///
/// Geocodes the place, finds the nearest districts, and averages their
/// readings. A fresh index is built for every request; nothing is kept
/// between calls.
pub struct ProximityProcessor<G> {
    geocoder: G,
    neighbors: usize,
    leaf_size: usize,
    strategy: IndexStrategy,
}

impl<G: Geocoder> ProximityProcessor<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            neighbors: DEFAULT_NEIGHBORS,
            leaf_size: DEFAULT_LEAF_SIZE,
            strategy: IndexStrategy::default(),
        }
    }

    pub fn from_settings(geocoder: G, settings: &QuerySettings) -> Self {
        Self::new(geocoder)
            .with_neighbors(settings.neighbors)
            .with_leaf_size(settings.leaf_size)
            .with_strategy(settings.index)
    }

    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    pub fn with_strategy(mut self, strategy: IndexStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Geocode `location` and average `metals` over the nearest districts.
    ///
    /// The request is checked against the dataset before the geocoder is
    /// called, so an invalid request never reaches the network.
    pub fn nearby_district_averages<S: AsRef<str>>(
        &self,
        dataset: &DistrictDataset,
        location: &str,
        metals: &[S],
    ) -> Result<ProximityReport> {
        self.check_request(dataset, metals)?;

        let found = self
            .geocoder
            .resolve(location)?
            .ok_or_else(|| QueryError::LocationNotFound {
                location: location.to_string(),
            })?;
        info!(
            "Resolved '{}' to ({:.5}, {:.5})",
            location, found.point.latitude, found.point.longitude
        );

        let mut report = self.query(dataset, found.point, metals)?;
        report.location = Some(location.to_string());
        report.resolved_name = found.display_name;
        Ok(report)
    }

    /// Same as [`Self::nearby_district_averages`] for a known point.
    pub fn averages_near_point<S: AsRef<str>>(
        &self,
        dataset: &DistrictDataset,
        point: GeoPoint,
        metals: &[S],
    ) -> Result<ProximityReport> {
        self.check_request(dataset, metals)?;
        self.query(dataset, point, metals)
    }

    fn check_request<S: AsRef<str>>(&self, dataset: &DistrictDataset, metals: &[S]) -> Result<()> {
        if dataset.is_empty() {
            return Err(QueryError::EmptyDataset);
        }
        check_neighbor_count(self.neighbors, dataset.len())?;
        for metal in metals {
            dataset.column_index(metal.as_ref())?;
        }
        Ok(())
    }

    fn query<S: AsRef<str>>(
        &self,
        dataset: &DistrictDataset,
        point: GeoPoint,
        metals: &[S],
    ) -> Result<ProximityReport> {
        let index = self
            .strategy
            .build(&dataset.coordinates(), self.leaf_size)?;
        let neighbors = index.nearest(&point, self.neighbors)?;
        debug!(
            "Nearest {} of {} districts: {:?}",
            neighbors.len(),
            dataset.len(),
            neighbors.iter().map(|n| n.index).collect::<Vec<_>>()
        );

        let rows: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        let result = Aggregator::new().average(dataset, &rows, metals)?;

        let selected = neighbors
            .iter()
            .map(|n| {
                let record = dataset.record(n.index)?;
                Ok(SelectedDistrict {
                    row: n.index,
                    district: record.district.clone(),
                    latitude: record.latitude,
                    longitude: record.longitude,
                    distance_km: n.distance_km(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ProximityReport {
            location: None,
            resolved_name: None,
            query: point,
            neighbors: self.neighbors,
            selected,
            result,
        })
    }
}

/// One-call form: geocode `location`, then average `metals` over its `k`
/// nearest districts (3 when `k` is `None`).
pub fn nearby_district_averages<G, S>(
    dataset: &DistrictDataset,
    location: &str,
    metals: &[S],
    k: Option<usize>,
    geocoder: &G,
) -> Result<AverageResult>
where
    G: Geocoder + ?Sized,
    S: AsRef<str>,
{
    ProximityProcessor::new(geocoder)
        .with_neighbors(k.unwrap_or(DEFAULT_NEIGHBORS))
        .nearby_district_averages(dataset, location, metals)
        .map(|report| report.result)
}
