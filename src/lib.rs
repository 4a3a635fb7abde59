#![doc = include_str!("../README.md")]

mod error;
pub mod geometry;
pub mod quadtree;
pub mod record;
pub mod stream;
mod r#type;

pub use error::{QuadtreeError, RecordField};
pub use r#type::IndexableNum;

#[cfg(test)]
pub(crate) mod test;
