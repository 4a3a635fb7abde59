//! A point quadtree with lazy subdivision and branch-and-bound nearest-neighbor search.
//!
//! Records are added through a [`QuadtreeBuilder`]; [`QuadtreeBuilder::finish`] seals it into an
//! immutable [`Quadtree`] that answers queries. Every node holds at most `capacity` records. When
//! a full node receives another record it is split once into four quadrants (NW, NE, SW, SE) and
//! that record, like every later one, is routed into the first quadrant containing it. The
//! records a node held when it was split stay on that node.

#![warn(missing_docs)]

mod builder;
mod index;
mod node;
mod search;
mod traversal;

pub use builder::{QuadtreeBuilder, DEFAULT_NODE_CAPACITY};
pub use index::{Quadtree, QuadtreeOptions};
pub use search::{ChildOrder, SearchStrategy};
pub use traversal::{Node, Quadrant};
