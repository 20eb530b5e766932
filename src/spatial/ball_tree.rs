//! Ball tree over `[lat, lon]` radians under haversine distance.
//!
//! Each node covers a contiguous run of `order` and is bounded by a ball: a
//! centre on the sphere and the largest haversine distance from it to any
//! member. Because haversine satisfies the triangle inequality, no point in
//! a node can be closer to the query than `d(query, centre) - radius`, which
//! is what lets whole subtrees be skipped.

use crate::error::{QueryError, Result};
use crate::models::{GeoPoint, Neighbor};
use crate::spatial::haversine::haversine;
use crate::spatial::{check_neighbor_count, compare_neighbors, NeighborIndex};
use crate::utils::constants::DEFAULT_LEAF_SIZE;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

/// Rounding allowance on a node's lower bound. Haversine loses precision
/// near antipodal pairs, so pruning only happens when a node is clearly
/// farther than the current k-th candidate.
const BOUND_SLACK: f64 = 1e-7;

/// Below this norm the members' mean direction is meaningless (points spread
/// evenly around the globe) and the first member is used as the centre.
const MIN_CENTROID_NORM: f64 = 1e-12;

#[derive(Debug, Clone)]
struct BallNode {
    start: usize,
    end: usize,
    center: [f64; 2],
    radius: f64,
    children: Option<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct BallTree {
    points: Vec<[f64; 2]>,
    order: Vec<usize>,
    nodes: Vec<BallNode>,
    leaf_size: usize,
}

impl BallTree {
    pub fn build(points: &[GeoPoint]) -> Result<Self> {
        Self::with_leaf_size(points, DEFAULT_LEAF_SIZE)
    }

    pub fn with_leaf_size(points: &[GeoPoint], leaf_size: usize) -> Result<Self> {
        if points.is_empty() {
            return Err(QueryError::EmptyDataset);
        }
        if leaf_size == 0 {
            return Err(QueryError::InvalidFormat(
                "Ball tree leaf size must be at least 1".to_string(),
            ));
        }

        let mut tree = Self {
            points: points.iter().map(GeoPoint::to_radians).collect(),
            order: (0..points.len()).collect(),
            nodes: Vec::new(),
            leaf_size,
        };
        tree.build_node(0, points.len());

        debug!(
            "Built ball tree: {} points, {} nodes, leaf size {}",
            tree.points.len(),
            tree.nodes.len(),
            leaf_size
        );

        Ok(tree)
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn build_node(&mut self, start: usize, end: usize) -> usize {
        let (center, radius) = self.bounding_ball(start, end);
        let id = self.nodes.len();
        self.nodes.push(BallNode {
            start,
            end,
            center,
            radius,
            children: None,
        });

        if end - start > self.leaf_size {
            let axis = self.widest_axis(start, end);
            let points = &self.points;
            self.order[start..end].sort_by(|&a, &b| {
                points[a][axis]
                    .total_cmp(&points[b][axis])
                    .then_with(|| a.cmp(&b))
            });

            let mid = start + (end - start) / 2;
            let left = self.build_node(start, mid);
            let right = self.build_node(mid, end);
            self.nodes[id].children = Some((left, right));
        }

        id
    }

    /// Centre is the normalised mean of the members' unit vectors; radius is
    /// the farthest member from it.
    fn bounding_ball(&self, start: usize, end: usize) -> ([f64; 2], f64) {
        let members = &self.order[start..end];

        let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
        for &i in members {
            let [lat, lon] = self.points[i];
            x += lat.cos() * lon.cos();
            y += lat.cos() * lon.sin();
            z += lat.sin();
        }

        let norm = (x * x + y * y + z * z).sqrt();
        let center = if norm > MIN_CENTROID_NORM {
            [(z / norm).clamp(-1.0, 1.0).asin(), y.atan2(x)]
        } else {
            self.points[members[0]]
        };

        let radius = members
            .iter()
            .map(|&i| haversine(center, self.points[i]))
            .fold(0.0, f64::max);

        (center, radius)
    }

    /// 0 for latitude, 1 for longitude, whichever spreads wider.
    fn widest_axis(&self, start: usize, end: usize) -> usize {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];

        for &i in &self.order[start..end] {
            for axis in 0..2 {
                min[axis] = min[axis].min(self.points[i][axis]);
                max[axis] = max[axis].max(self.points[i][axis]);
            }
        }

        if max[0] - min[0] >= max[1] - min[1] {
            0
        } else {
            1
        }
    }

    fn search(
        &self,
        node_id: usize,
        query: [f64; 2],
        k: usize,
        best: &mut BinaryHeap<Candidate>,
    ) {
        let node = &self.nodes[node_id];

        if best.len() == k {
            let lower_bound = (haversine(query, node.center) - node.radius).max(0.0);
            if let Some(worst) = best.peek() {
                if lower_bound > worst.0.distance + BOUND_SLACK {
                    return;
                }
            }
        }

        match node.children {
            None => {
                for &index in &self.order[node.start..node.end] {
                    let candidate = Candidate(Neighbor {
                        index,
                        distance: haversine(query, self.points[index]),
                    });
                    push_bounded(best, candidate, k);
                }
            }
            Some((left, right)) => {
                let to_left = haversine(query, self.nodes[left].center);
                let to_right = haversine(query, self.nodes[right].center);
                let (first, second) = if to_left <= to_right {
                    (left, right)
                } else {
                    (right, left)
                };
                self.search(first, query, k, best);
                self.search(second, query, k, best);
            }
        }
    }
}

impl NeighborIndex for BallTree {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn nearest(&self, query: &GeoPoint, k: usize) -> Result<Vec<Neighbor>> {
        check_neighbor_count(k, self.points.len())?;

        let mut best = BinaryHeap::with_capacity(k + 1);
        self.search(0, query.to_radians(), k, &mut best);

        let mut neighbors: Vec<Neighbor> = best.into_iter().map(|c| c.0).collect();
        neighbors.sort_by(compare_neighbors);
        Ok(neighbors)
    }
}

/// Max-heap entry: the worst of the current k candidates sits on top.
#[derive(Debug, Clone, Copy)]
struct Candidate(Neighbor);

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_neighbors(&self.0, &other.0)
    }
}

fn push_bounded(best: &mut BinaryHeap<Candidate>, candidate: Candidate, k: usize) {
    if best.len() < k {
        best.push(candidate);
    } else if let Some(worst) = best.peek() {
        if candidate < *worst {
            best.pop();
            best.push(candidate);
        }
    }
}
