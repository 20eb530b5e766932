use crate::error::{QueryError, Result};
use crate::models::{GeoPoint, Neighbor};
use crate::spatial::haversine::haversine;
use crate::spatial::{check_neighbor_count, compare_neighbors, NeighborIndex};

/// Exhaustive nearest-neighbor scan.
///
/// Computes the distance to every point and sorts; the reference every other
/// index is checked against.
#[derive(Debug, Clone)]
pub struct LinearIndex {
    points: Vec<[f64; 2]>,
}

impl LinearIndex {
    pub fn build(points: &[GeoPoint]) -> Result<Self> {
        if points.is_empty() {
            return Err(QueryError::EmptyDataset);
        }

        Ok(Self {
            points: points.iter().map(GeoPoint::to_radians).collect(),
        })
    }
}

impl NeighborIndex for LinearIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn nearest(&self, query: &GeoPoint, k: usize) -> Result<Vec<Neighbor>> {
        check_neighbor_count(k, self.points.len())?;

        let q = query.to_radians();
        let mut hits: Vec<Neighbor> = self
            .points
            .iter()
            .enumerate()
            .map(|(index, &p)| Neighbor {
                index,
                distance: haversine(q, p),
            })
            .collect();

        hits.sort_by(compare_neighbors);
        hits.truncate(k);
        Ok(hits)
    }
}
