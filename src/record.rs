//! The vehicle position record stored in the index.

use crate::geometry::Point;
use crate::r#type::IndexableNum;

/// A single GPS fix of a vehicle.
///
/// Records are immutable once constructed; the quadtree never updates or removes them.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRecord<N: IndexableNum = f32> {
    id: i32,
    label: String,
    position: Point<N>,
    timestamp: u64,
}

impl<N: IndexableNum> PositionRecord<N> {
    /// Create a record from its decoded fields.
    pub fn new(id: i32, label: impl Into<String>, position: Point<N>, timestamp: u64) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            timestamp,
        }
    }

    /// The vehicle identifier.
    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// The vehicle registration.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn position(&self) -> Point<N> {
        self.position
    }

    /// Recording time (UTC) as stored in the record stream.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}
