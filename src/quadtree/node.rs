use crate::geometry::Rectangle;
use crate::r#type::IndexableNum;
use crate::record::PositionRecord;

/// Storage for one node of the tree.
///
/// Nodes live in a single arena. The four children of a node are allocated next to each other in
/// NW, NE, SW, SE order, so a node only stores the arena index of its first child.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeData<N: IndexableNum> {
    pub(crate) bounds: Rectangle<N>,
    pub(crate) records: Vec<PositionRecord<N>>,
    pub(crate) first_child: Option<usize>,
    pub(crate) depth: usize,
}

impl<N: IndexableNum> NodeData<N> {
    pub(crate) fn new(bounds: Rectangle<N>, depth: usize) -> Self {
        Self {
            bounds,
            records: vec![],
            first_child: None,
            depth,
        }
    }

    /// Arena indices of the children, in NW, NE, SW, SE order.
    #[inline]
    pub(crate) fn children(&self) -> Option<std::ops::Range<usize>> {
        self.first_child.map(|first| first..first + 4)
    }
}
