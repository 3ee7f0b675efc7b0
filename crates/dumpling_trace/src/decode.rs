//! Rebuilding resolved frames from incremental blocks.

use crate::block::{FieldValues, ParsedBlock, Slot};
use crate::segment::segment;
use crate::store::BackingStore;
use dumpling_core::{FormatError, Frame, Trace, TraceResult};
use tracing::debug;

/// Largest number of slots, arguments and registers together, that all
/// frames of one dump may expose
pub const MAX_TRACE_SLOTS: usize = 1 << 20;

/// State carried from one block to the next while decoding a single dump.
///
/// A fresh carry state is created per dump and threaded by value through
/// [`decode_block`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryState {
    arguments: BackingStore,
    registers: BackingStore,
    previous: Option<Frame>,
}

impl CarryState {
    /// Create the state for the start of a dump
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Argument backing store
    #[must_use]
    pub fn arguments(&self) -> &BackingStore {
        &self.arguments
    }

    /// Register backing store
    #[must_use]
    pub fn registers(&self) -> &BackingStore {
        &self.registers
    }

    /// Last decoded frame, if any
    #[must_use]
    pub fn previous(&self) -> Option<&Frame> {
        self.previous.as_ref()
    }

    /// Argument and register counts a block resolves to after inheritance
    #[must_use]
    pub fn resolved_counts(&self, fields: &FieldValues) -> (usize, usize) {
        let previous = self.previous.as_ref();
        let arguments = fields
            .argument_count
            .or_else(|| previous.map(|p| p.arguments.len()))
            .unwrap_or(0);
        let registers = fields
            .register_count
            .or_else(|| previous.map(|p| p.registers.len()))
            .unwrap_or(0);
        (arguments, registers)
    }
}

/// Resolve one parsed block against the carry state.
///
/// Absent fields are inherited from the previous frame. Without one, offsets
/// and ids default to `-1`, the accumulator to `""` and counts to zero.
#[must_use]
pub fn decode_block(mut carry: CarryState, block: ParsedBlock) -> (CarryState, Frame) {
    let (argument_count, register_count) = carry.resolved_counts(&block.fields);
    let fields = block.fields;
    let previous = carry.previous.as_ref();

    let bytecode_offset = fields
        .bytecode_offset
        .or_else(|| previous.map(|p| p.bytecode_offset))
        .unwrap_or(-1);
    let function_id = fields
        .function_id
        .or_else(|| previous.map(|p| p.function_id))
        .unwrap_or(-1);
    let accumulator = fields
        .accumulator
        .or_else(|| previous.map(|p| p.accumulator.clone()))
        .unwrap_or_default();

    for write in block.writes {
        let store = match write.slot {
            Slot::Argument => &mut carry.arguments,
            Slot::Register => &mut carry.registers,
        };
        let written = store.write(write.index, write.value);
        debug_assert!(written, "slot index {} passed the parser", write.index);
    }

    let frame = Frame {
        bytecode_offset,
        function_id,
        accumulator,
        arguments: carry.arguments.expose(argument_count),
        registers: carry.registers.expose(register_count),
        frame_type: block.frame_type,
    };

    carry.previous = Some(frame.clone());
    (carry, frame)
}

/// Decode a whole dump into resolved frames, exposing at most
/// [`MAX_TRACE_SLOTS`] slots in total.
///
/// # Errors
///
/// Returns the first [`dumpling_core::FormatError`] found; no partial trace
/// is produced.
pub fn decode_trace(dump: &str) -> TraceResult<Trace> {
    decode_trace_with_limit(dump, MAX_TRACE_SLOTS)
}

/// Decode a whole dump, exposing at most `limit` slots over all frames.
///
/// Every frame copies its visible slots out of the backing stores, and
/// counts are inherited, so a few bytes per block can otherwise demand
/// tens of thousands of slots each.
///
/// # Errors
///
/// Returns [`FormatError::TraceSlotLimitExceeded`] at the header of the
/// first frame that crosses `limit`, or any other [`FormatError`] found.
pub fn decode_trace_with_limit(dump: &str, limit: usize) -> TraceResult<Trace> {
    let blocks = segment(dump)?;
    let mut carry = CarryState::new();
    let mut frames = Vec::with_capacity(blocks.len());
    let mut exposed: u64 = 0;

    for block in &blocks {
        let parsed = ParsedBlock::parse(block)?;

        let (arguments, registers) = carry.resolved_counts(&parsed.fields);
        exposed = exposed.saturating_add((arguments + registers) as u64);
        if exposed > limit as u64 {
            return Err(FormatError::TraceSlotLimitExceeded {
                line: block.header_line,
                total: exposed,
                limit,
            });
        }

        let (next, frame) = decode_block(carry, parsed);
        carry = next;

        debug!(
            line = block.header_line,
            tier = %frame.frame_type,
            offset = frame.bytecode_offset,
            function = frame.function_id,
            arguments = frame.arguments.len(),
            registers = frame.registers.len(),
            "decoded frame"
        );
        frames.push(frame);
    }

    debug!(
        frames = frames.len(),
        exposed,
        argument_slots = carry.arguments().len(),
        register_slots = carry.registers().len(),
        "decoded trace"
    );
    Ok(frames)
}
