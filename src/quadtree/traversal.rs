//! Utilities to traverse the Quadtree structure.

use geo_traits::{
    Dimensions, GeometryTrait, GeometryType, RectTrait, UnimplementedGeometryCollection,
    UnimplementedLine, UnimplementedLineString, UnimplementedMultiLineString,
    UnimplementedMultiPoint, UnimplementedMultiPolygon, UnimplementedPoint, UnimplementedPolygon,
    UnimplementedTriangle,
};

use crate::geometry::{Point, Rectangle};
use crate::quadtree::index::Quadtree;
use crate::r#type::IndexableNum;
use crate::record::PositionRecord;

/// The position of a child within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Low latitude, low longitude.
    NorthWest,
    /// High latitude, low longitude.
    NorthEast,
    /// Low latitude, high longitude.
    SouthWest,
    /// High latitude, high longitude.
    SouthEast,
}

impl Quadrant {
    /// All quadrants in the order children are stored and tested on insertion.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];
}

/// A node in the Quadtree.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a, N: IndexableNum> {
    /// The tree that this node is a reference onto
    tree: &'a Quadtree<N>,

    /// Index of this node in the tree's node arena.
    index: usize,
}

impl<'a, N: IndexableNum> Node<'a, N> {
    pub(crate) fn new(tree: &'a Quadtree<N>, index: usize) -> Self {
        Self { tree, index }
    }

    /// The rectangle covered by this node.
    pub fn bounds(&self) -> Rectangle<N> {
        self.tree.nodes[self.index].bounds
    }

    /// The records stored directly on this node.
    ///
    /// For an internal node these are the `capacity` records it held when it was subdivided.
    pub fn records(&self) -> &'a [PositionRecord<N>] {
        &self.tree.nodes[self.index].records
    }

    /// The distance from the root; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.tree.nodes[self.index].depth
    }

    /// Returns `true` if this is a leaf node without children.
    pub fn is_leaf(&self) -> bool {
        self.tree.nodes[self.index].first_child.is_none()
    }

    /// Returns `true` if this is an internal node with children.
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// The four children of this node in NW, NE, SW, SE order, or `None` for a leaf.
    pub fn children(&self) -> Option<[Node<'a, N>; 4]> {
        let first = self.tree.nodes[self.index].first_child?;
        Some([0, 1, 2, 3].map(|offset| Node::new(self.tree, first + offset)))
    }

    /// The child covering the given quadrant, or `None` for a leaf.
    pub fn child(&self, quadrant: Quadrant) -> Option<Node<'a, N>> {
        let first = self.tree.nodes[self.index].first_child?;
        let offset = match quadrant {
            Quadrant::NorthWest => 0,
            Quadrant::NorthEast => 1,
            Quadrant::SouthWest => 2,
            Quadrant::SouthEast => 3,
        };
        Some(Node::new(self.tree, first + offset))
    }

    /// The deepest node on the path from this node whose bounds contain `point`, following the
    /// same quadrant priority as insertion. Returns `None` if this node does not contain `point`.
    pub fn locate(&self, point: &Point<N>) -> Option<Node<'a, N>> {
        if !self.bounds().contains(point) {
            return None;
        }
        let mut node = *self;
        while let Some(children) = node.children() {
            match children.into_iter().find(|child| child.bounds().contains(point)) {
                Some(child) => node = child,
                None => break,
            }
        }
        Some(node)
    }

    /// Depth-first iterator over this node and all of its descendants, parents before children.
    pub fn descendants(&self) -> impl Iterator<Item = Node<'a, N>> {
        let mut stack = vec![*self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Some(children) = node.children() {
                // Pushed in reverse so that NW is visited first.
                stack.extend(children.into_iter().rev());
            }
            Some(node)
        })
    }
}

impl<'a, N: IndexableNum> GeometryTrait for Node<'a, N> {
    type T = N;
    type PointType<'b>
        = UnimplementedPoint<N>
    where
        Self: 'b;
    type LineStringType<'b>
        = UnimplementedLineString<N>
    where
        Self: 'b;
    type PolygonType<'b>
        = UnimplementedPolygon<N>
    where
        Self: 'b;
    type MultiPointType<'b>
        = UnimplementedMultiPoint<N>
    where
        Self: 'b;
    type MultiLineStringType<'b>
        = UnimplementedMultiLineString<N>
    where
        Self: 'b;
    type MultiPolygonType<'b>
        = UnimplementedMultiPolygon<N>
    where
        Self: 'b;
    type GeometryCollectionType<'b>
        = UnimplementedGeometryCollection<N>
    where
        Self: 'b;
    type RectType<'b>
        = Node<'a, N>
    where
        Self: 'b;
    type TriangleType<'b>
        = UnimplementedTriangle<N>
    where
        Self: 'b;
    type LineType<'b>
        = UnimplementedLine<N>
    where
        Self: 'b;

    fn dim(&self) -> Dimensions {
        Dimensions::Xy
    }

    fn as_type(
        &self,
    ) -> GeometryType<
        '_,
        UnimplementedPoint<N>,
        UnimplementedLineString<N>,
        UnimplementedPolygon<N>,
        UnimplementedMultiPoint<N>,
        UnimplementedMultiLineString<N>,
        UnimplementedMultiPolygon<N>,
        UnimplementedGeometryCollection<N>,
        Node<'a, N>,
        UnimplementedTriangle<N>,
        UnimplementedLine<N>,
    > {
        GeometryType::Rect(self)
    }
}

impl<N: IndexableNum> RectTrait for Node<'_, N> {
    type CoordType<'a>
        = Point<N>
    where
        Self: 'a;

    fn min(&self) -> Self::CoordType<'_> {
        Point::new(self.bounds().min_x(), self.bounds().min_y())
    }

    fn max(&self) -> Self::CoordType<'_> {
        Point::new(self.bounds().max_x(), self.bounds().max_y())
    }
}
