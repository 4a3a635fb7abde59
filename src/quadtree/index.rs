use geo_traits::CoordTrait;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::geometry::{Point, Rectangle};
use crate::quadtree::builder::DEFAULT_NODE_CAPACITY;
use crate::quadtree::node::NodeData;
use crate::quadtree::search::{nearest, SearchStrategy};
use crate::quadtree::traversal::Node;
use crate::r#type::IndexableNum;
use crate::record::PositionRecord;

/// Options describing a tree: its root bounds, node capacity and default search strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadtreeOptions<N: IndexableNum = f32> {
    /// Bounds of the root node. Records outside these bounds are dropped on insertion.
    pub bounds: Rectangle<N>,
    /// Maximum number of records held directly by each node. Must be positive.
    pub capacity: usize,
    /// Strategy used by [`Quadtree::find_nearest`].
    pub strategy: SearchStrategy,
}

impl<N: IndexableNum> QuadtreeOptions<N> {
    /// Options covering `bounds`, with the default capacity and search strategy.
    pub fn new(bounds: Rectangle<N>) -> Self {
        Self {
            bounds,
            capacity: DEFAULT_NODE_CAPACITY,
            strategy: SearchStrategy::default(),
        }
    }

    /// Replace the root bounds.
    pub fn with_bounds(self, bounds: Rectangle<N>) -> Self {
        Self { bounds, ..self }
    }

    /// Replace the node capacity.
    pub fn with_capacity(self, capacity: usize) -> Self {
        Self { capacity, ..self }
    }

    /// Replace the default search strategy.
    pub fn with_strategy(self, strategy: SearchStrategy) -> Self {
        Self { strategy, ..self }
    }
}

impl<N: IndexableNum> Default for QuadtreeOptions<N> {
    /// World bounds, a capacity of [`DEFAULT_NODE_CAPACITY`] and [`SearchStrategy::EXACT`].
    fn default() -> Self {
        Self::new(Rectangle::world())
    }
}

/// An immutable quadtree over [`PositionRecord`]s.
///
/// Usually this will be created via [`QuadtreeBuilder`][crate::quadtree::QuadtreeBuilder]. All
/// methods take `&self`, so a finished tree can be queried from several threads at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadtree<N: IndexableNum = f32> {
    pub(crate) nodes: Vec<NodeData<N>>,
    pub(crate) options: QuadtreeOptions<N>,
    pub(crate) num_items: usize,
}

impl<N: IndexableNum> Quadtree<N> {
    /// The total number of records stored in this tree.
    pub fn len(&self) -> usize {
        self.num_items
    }

    /// Returns `true` if the tree holds no record.
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// The total number of nodes in this tree, including both leaf and internal nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The maximum number of records held directly by each node.
    pub fn capacity(&self) -> usize {
        self.options.capacity
    }

    /// The bounds of the root node.
    pub fn bounds(&self) -> Rectangle<N> {
        self.options.bounds
    }

    /// The strategy used by [`Quadtree::find_nearest`].
    pub fn strategy(&self) -> SearchStrategy {
        self.options.strategy
    }

    /// Access the options describing this tree.
    pub fn options(&self) -> &QuadtreeOptions<N> {
        &self.options
    }

    /// The depth of the deepest node. A tree that never subdivided has depth 0.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Access the root node of the tree for manual traversal.
    pub fn root(&self) -> Node<'_, N> {
        Node::new(self, 0)
    }

    /// Iterate over all stored records.
    ///
    /// Records are yielded node by node in subdivision order, not in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PositionRecord<N>> {
        self.nodes.iter().flat_map(|node| node.records.iter())
    }

    /// Find the record nearest to `target` using the tree's configured search strategy.
    ///
    /// Returns `None` if the tree holds no record, or if `target` has a NaN or infinite
    /// coordinate. Use [`Point::try_new`] to validate untrusted query points.
    pub fn find_nearest(&self, target: &Point<N>) -> Option<&PositionRecord<N>> {
        self.find_nearest_with(target, self.options.strategy)
    }

    /// Find the record nearest to `target` using the given search strategy.
    pub fn find_nearest_with(
        &self,
        target: &Point<N>,
        strategy: SearchStrategy,
    ) -> Option<&PositionRecord<N>> {
        nearest(&self.nodes, target, strategy).map(|(record, _)| record)
    }

    /// Find the record nearest to a coordinate, reading `x` as latitude and `y` as longitude.
    pub fn find_nearest_coord(&self, coord: &impl CoordTrait<T = N>) -> Option<&PositionRecord<N>> {
        self.find_nearest(&Point::from_coord(coord))
    }

    /// Find the record nearest to `target` together with its squared distance to `target`.
    pub fn nearest_with_distance(&self, target: &Point<N>) -> Option<(&PositionRecord<N>, N)> {
        nearest(&self.nodes, target, self.options.strategy)
    }

    /// Find the nearest record for each target, in order.
    ///
    /// With the `rayon` feature the queries run in parallel.
    pub fn find_nearest_many(&self, targets: &[Point<N>]) -> Vec<Option<&PositionRecord<N>>> {
        #[cfg(feature = "rayon")]
        {
            targets
                .par_iter()
                .map(|target| self.find_nearest(target))
                .collect()
        }

        #[cfg(not(feature = "rayon"))]
        {
            targets
                .iter()
                .map(|target| self.find_nearest(target))
                .collect()
        }
    }
}
