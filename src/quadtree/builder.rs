use tracing::trace;

use crate::geometry::Rectangle;
use crate::quadtree::index::{Quadtree, QuadtreeOptions};
use crate::quadtree::node::NodeData;
use crate::r#type::IndexableNum;
use crate::record::PositionRecord;

/// The default node capacity used by [`QuadtreeBuilder::new`]
pub const DEFAULT_NODE_CAPACITY: usize = 4;

/// A builder to create a [`Quadtree`].
///
/// ```
/// use geo_quadtree::geometry::{Point, Rectangle};
/// use geo_quadtree::quadtree::QuadtreeBuilder;
/// use geo_quadtree::record::PositionRecord;
///
/// let mut builder = QuadtreeBuilder::new(Rectangle::world());
/// builder.add(PositionRecord::new(1, "ABC-123", Point::new(34.5f32, -102.1), 0));
/// builder.add(PositionRecord::new(2, "XYZ-789", Point::new(32.3, -99.1), 0));
/// let tree = builder.finish();
///
/// let nearest = tree.find_nearest(&Point::new(32.0, -99.0)).unwrap();
/// assert_eq!(nearest.id(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct QuadtreeBuilder<N: IndexableNum = f32> {
    nodes: Vec<NodeData<N>>,
    options: QuadtreeOptions<N>,
    num_items: usize,
    num_dropped: usize,
}

impl<N: IndexableNum> QuadtreeBuilder<N> {
    /// Create a new builder covering `bounds` with the default node capacity.
    pub fn new(bounds: Rectangle<N>) -> Self {
        Self::new_with_capacity(bounds, DEFAULT_NODE_CAPACITY)
    }

    /// Create a new builder covering `bounds` with the provided node capacity.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn new_with_capacity(bounds: Rectangle<N>, capacity: usize) -> Self {
        Self::from_options(QuadtreeOptions::new(bounds).with_capacity(capacity))
    }

    /// Create a new builder with the provided options.
    ///
    /// # Panics
    ///
    /// If `options.capacity` is zero.
    pub fn from_options(options: QuadtreeOptions<N>) -> Self {
        assert!(options.capacity > 0, "Node capacity must be positive.");
        Self {
            nodes: vec![NodeData::new(options.bounds, 0)],
            options,
            num_items: 0,
            num_dropped: 0,
        }
    }

    /// Access the options this builder was created with.
    pub fn options(&self) -> &QuadtreeOptions<N> {
        &self.options
    }

    /// The number of records stored so far.
    pub fn len(&self) -> usize {
        self.num_items
    }

    /// Returns `true` if no record has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// The number of records that were dropped because they fell outside the root bounds.
    pub fn num_dropped(&self) -> usize {
        self.num_dropped
    }

    /// Add a record to the tree.
    ///
    /// Records positioned outside the root bounds are dropped without error. Returns `true` if the
    /// record was stored.
    pub fn add(&mut self, record: PositionRecord<N>) -> bool {
        let position = record.position();
        if !self.nodes[0].bounds.contains(&position) {
            trace!(id = record.id(), "dropping record outside root bounds");
            self.num_dropped += 1;
            return false;
        }

        let capacity = self.options.capacity;
        let mut node_index = 0;
        loop {
            let node = &mut self.nodes[node_index];
            if node.records.len() < capacity {
                node.records.push(record);
                self.num_items += 1;
                return true;
            }

            let first_child = node.first_child;
            let first_child = match first_child {
                Some(first_child) => first_child,
                None => self.subdivide(node_index),
            };

            // Shared edges belong to several quadrants; the first one in NW, NE, SW, SE order
            // wins.
            let child = (first_child..first_child + 4)
                .find(|&child| self.nodes[child].bounds.contains(&position));
            match child {
                Some(child) => node_index = child,
                None => {
                    trace!(id = record.id(), "no quadrant claims record");
                    self.num_dropped += 1;
                    return false;
                }
            }
        }
    }

    /// Split a full node into four children. Returns the arena index of the first child.
    fn subdivide(&mut self, node_index: usize) -> usize {
        let first_child = self.nodes.len();
        let parent = &mut self.nodes[node_index];
        debug_assert!(parent.first_child.is_none(), "node subdivided twice");
        parent.first_child = Some(first_child);

        let depth = parent.depth + 1;
        let quadrants = parent.bounds.quadrants();
        trace!(node = node_index, depth, "subdividing node");

        self.nodes.extend(
            quadrants
                .into_iter()
                .map(|bounds| NodeData::new(bounds, depth)),
        );
        first_child
    }

    /// Consume this builder, generating a Quadtree ready for queries.
    pub fn finish(self) -> Quadtree<N> {
        Quadtree {
            nodes: self.nodes,
            options: self.options,
            num_items: self.num_items,
        }
    }
}

impl<N: IndexableNum> Extend<PositionRecord<N>> for QuadtreeBuilder<N> {
    fn extend<T: IntoIterator<Item = PositionRecord<N>>>(&mut self, iter: T) {
        for record in iter {
            self.add(record);
        }
    }
}
