//! Dumpling Core Types
//!
//! Frame snapshots dumped by the V8 execution tiers, the sentinel values
//! that appear inside them, and the error raised for malformed dumps.
//! This crate contains pure types and logic with no I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod frame;

// Re-exports
pub use error::{FormatError, TraceResult};
pub use frame::{Frame, FrameType, MISSING, OPTIMIZED_OUT, Trace};
