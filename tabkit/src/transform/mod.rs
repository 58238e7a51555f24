//! Table transformations.
//!
//! - Reindex: replace the `Date` column with a leading `day` counter
//! - Pipeline: file-level read / reindex / write

pub mod pipeline;
pub mod reindex;

pub use pipeline::*;
pub use reindex::*;
