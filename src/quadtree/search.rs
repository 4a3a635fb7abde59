//! Branch-and-bound nearest-neighbor search.

use std::cmp::Ordering;

use tinyvec::ArrayVec;

use crate::geometry::{squared_distance, BoundMetric, Point};
use crate::quadtree::node::NodeData;
use crate::r#type::IndexableNum;
use crate::record::PositionRecord;

/// The order in which the children of a node are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildOrder {
    /// Always NW, NE, SW, SE.
    Fixed,

    /// Ascending by the bound to each child. Children with equal bounds keep NW, NE, SW, SE
    /// order.
    #[default]
    ByDistance,
}

/// How [`Quadtree::find_nearest`][crate::quadtree::Quadtree::find_nearest] prunes and orders
/// the subtrees it visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStrategy {
    /// The rectangle distance compared against the best match so far. A child is visited only if
    /// its bound is strictly smaller.
    pub bound: BoundMetric,
    /// The order children are visited in.
    pub order: ChildOrder,
}

impl SearchStrategy {
    /// Prune with the distance to the nearest point of each child and visit closer children
    /// first. Always returns a record at the minimum distance.
    pub const EXACT: Self = Self {
        bound: BoundMetric::Nearest,
        order: ChildOrder::ByDistance,
    };

    /// Prune with the distance to the farthest corner of each child and visit children in fixed
    /// NW, NE, SW, SE order.
    ///
    /// Use this only where results must match the farthest-corner search exactly, misses
    /// included: the farthest corner overestimates the distance to a child, so a subtree holding
    /// the true nearest record can be skipped.
    pub const COMPATIBLE: Self = Self {
        bound: BoundMetric::FarthestCorner,
        order: ChildOrder::Fixed,
    };
}

impl Default for SearchStrategy {
    fn default() -> Self {
        Self::EXACT
    }
}

/// The best match seen so far.
#[derive(Debug, Clone, Copy)]
struct Best<'a, N: IndexableNum> {
    dist: N,
    record: Option<&'a PositionRecord<N>>,
}

/// Search the tree stored in `nodes`, whose root is at index 0.
///
/// Returns the nearest record and its squared distance to `target`, or `None` if the tree is
/// empty.
pub(crate) fn nearest<'a, N: IndexableNum>(
    nodes: &'a [NodeData<N>],
    target: &Point<N>,
    strategy: SearchStrategy,
) -> Option<(&'a PositionRecord<N>, N)> {
    let best = Best {
        dist: N::infinity(),
        record: None,
    };
    let best = visit(nodes, 0, target, strategy, best);
    best.record.map(|record| (record, best.dist))
}

/// Visit one node, returning the updated best match.
fn visit<'a, N: IndexableNum>(
    nodes: &'a [NodeData<N>],
    node_index: usize,
    target: &Point<N>,
    strategy: SearchStrategy,
    mut best: Best<'a, N>,
) -> Best<'a, N> {
    let node = &nodes[node_index];

    // Internal nodes keep the records they held when they were split, so always scan them.
    for record in &node.records {
        let dist = squared_distance(&record.position(), target);
        if dist < best.dist {
            best = Best {
                dist,
                record: Some(record),
            };
        }
    }

    let Some(children) = node.children() else {
        return best;
    };

    let mut children: ArrayVec<[(N, usize); 4]> = children
        .map(|child| {
            let bound = strategy
                .bound
                .squared_distance(&nodes[child].bounds, target);
            (bound, child)
        })
        .collect();

    if strategy.order == ChildOrder::ByDistance {
        // Stable, so equal bounds keep quadrant order.
        children.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    }

    for (bound, child) in children {
        if bound < best.dist {
            best = visit(nodes, child, target, strategy, best);
        }
    }

    best
}
