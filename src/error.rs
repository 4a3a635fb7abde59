use std::fmt::{self, Display};

use thiserror::Error;

/// The field of a binary position record that was being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Identifier,
    Label,
    Latitude,
    Longitude,
    Timestamp,
}

impl Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordField::Identifier => "identifier",
            RecordField::Label => "label",
            RecordField::Latitude => "latitude",
            RecordField::Longitude => "longitude",
            RecordField::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum QuadtreeError {
    /// The record stream ended in the middle of a record.
    #[error("Malformed record stream: record {record} at byte {offset} ends in its {field}")]
    MalformedRecordStream {
        /// Zero-based index of the truncated record.
        record: usize,
        /// Byte offset at which the truncated record starts.
        offset: u64,
        /// The field being decoded when the stream ended.
        field: RecordField,
    },

    /// A rectangle whose minimum exceeds its maximum on some axis, or which has NaN coordinates.
    #[error("Invalid bounds: ({min_x}, {min_y}, {max_x}, {max_y})")]
    InvalidBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    /// A point with a NaN or infinite coordinate.
    #[error("Invalid point: ({latitude}, {longitude})")]
    InvalidPoint { latitude: f64, longitude: f64 },

    /// A label that cannot be written as a NUL-terminated single-byte string.
    #[error("Invalid label {0:?}: labels must be single-byte characters without NUL")]
    InvalidLabel(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuadtreeError>;
