//! Nearest-neighbor search over geographic coordinates.
//!
//! Every index answers the same question: the `k` rows closest to a query
//! point under haversine distance, nearest first, ties broken by row order.

pub mod ball_tree;
pub mod haversine;
pub mod linear;

pub use ball_tree::BallTree;
pub use haversine::{distance_km, haversine};
pub use linear::LinearIndex;

use crate::error::{QueryError, Result};
use crate::models::{GeoPoint, Neighbor};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub trait NeighborIndex {
    /// Number of indexed points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` nearest points to `query`, nearest first.
    ///
    /// Fails with [`QueryError::InvalidNeighborCount`] unless `1 <= k <= len()`.
    fn nearest(&self, query: &GeoPoint, k: usize) -> Result<Vec<Neighbor>>;
}

/// Which index a query is answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IndexStrategy {
    /// Metric tree with triangle-inequality pruning
    #[default]
    #[value(name = "ball")]
    BallTree,
    /// Exhaustive scan of every point
    Linear,
}

impl IndexStrategy {
    pub fn build(self, points: &[GeoPoint], leaf_size: usize) -> Result<Box<dyn NeighborIndex>> {
        Ok(match self {
            IndexStrategy::BallTree => Box::new(BallTree::with_leaf_size(points, leaf_size)?),
            IndexStrategy::Linear => Box::new(LinearIndex::build(points)?),
        })
    }
}

/// Total order on candidates: distance, then original row index.
pub(crate) fn compare_neighbors(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

pub(crate) fn check_neighbor_count(requested: usize, available: usize) -> Result<()> {
    if requested == 0 || requested > available {
        return Err(QueryError::InvalidNeighborCount {
            requested,
            available,
        });
    }
    Ok(())
}
