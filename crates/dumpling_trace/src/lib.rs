//! Dumpling Trace Decoder
//!
//! Frame dumps are written incrementally: a block only lists the fields and
//! slots that changed since the previous block of the same dump. This crate
//! splits a dump into blocks, parses each block on its own, and replays the
//! blocks in order to rebuild fully resolved frames.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod decode;
pub mod render;
pub mod segment;
pub mod store;

pub use block::{Field, FieldValues, IndexedWrite, MAX_SLOTS, ParsedBlock, Slot};
pub use decode::{CarryState, MAX_TRACE_SLOTS, decode_block, decode_trace, decode_trace_with_limit};
pub use render::{FullText, render_full};
pub use segment::{Block, Line, segment};
pub use store::BackingStore;
