// In crates/engine/src/lib.rs

//! One dashboard pass: fetch → indicators → signal.

pub mod pipeline;
pub mod snapshot;

pub use pipeline::Pipeline;
pub use snapshot::{IndicatorRow, Snapshot};
