//! Parsing a single block into the values it states explicitly.
//!
//! Nothing here looks at earlier blocks: an absent field stays `None` and
//! inheritance happens in [`crate::decode`].

use crate::segment::{Block, Line};
use dumpling_core::{FormatError, FrameType, TraceResult};

/// Largest argument/register count or slot index accepted from a dump
pub const MAX_SLOTS: usize = 1 << 16;

/// Optional field lines, in the order they must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `b:` bytecode offset
    BytecodeOffset,
    /// `f:` function id
    FunctionId,
    /// `x:` accumulator
    Accumulator,
    /// `n:` argument count
    ArgumentCount,
    /// `m:` register count
    RegisterCount,
}

impl Field {
    /// Fields in block order
    pub const ORDER: [Field; 5] = [
        Field::BytecodeOffset,
        Field::FunctionId,
        Field::Accumulator,
        Field::ArgumentCount,
        Field::RegisterCount,
    ];

    /// Line prefix, including the separator
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::BytecodeOffset => "b:",
            Self::FunctionId => "f:",
            Self::Accumulator => "x:",
            Self::ArgumentCount => "n:",
            Self::RegisterCount => "m:",
        }
    }
}

/// Field values stated by one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    /// `b:`
    pub bytecode_offset: Option<i64>,
    /// `f:`
    pub function_id: Option<i64>,
    /// `x:`
    pub accumulator: Option<String>,
    /// `n:`
    pub argument_count: Option<usize>,
    /// `m:`
    pub register_count: Option<usize>,
}

impl FieldValues {
    fn set(&mut self, field: Field, raw: &str, line: usize) -> TraceResult<()> {
        match field {
            Field::BytecodeOffset => self.bytecode_offset = Some(parse_int(field, raw, line)?),
            Field::FunctionId => self.function_id = Some(parse_int(field, raw, line)?),
            Field::Accumulator => self.accumulator = Some(raw.to_string()),
            Field::ArgumentCount => self.argument_count = Some(parse_count(field, raw, line)?),
            Field::RegisterCount => self.register_count = Some(parse_count(field, raw, line)?),
        }
        Ok(())
    }
}

fn parse_int(field: Field, raw: &str, line: usize) -> TraceResult<i64> {
    raw.parse().map_err(|_| FormatError::InvalidInteger {
        line,
        field: field.prefix(),
        value: raw.to_string(),
    })
}

fn parse_count(field: Field, raw: &str, line: usize) -> TraceResult<usize> {
    let value = parse_int(field, raw, line)?;
    if value < 0 {
        return Err(FormatError::NegativeCount {
            line,
            field: field.prefix(),
            value,
        });
    }
    check_slot_limit(value.unsigned_abs(), line)
}

fn check_slot_limit(value: u64, line: usize) -> TraceResult<usize> {
    match usize::try_from(value) {
        Ok(count) if count <= MAX_SLOTS => Ok(count),
        _ => Err(FormatError::SlotLimitExceeded {
            line,
            value,
            limit: MAX_SLOTS,
        }),
    }
}

/// Which backing store an indexed line writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// `a<i>:`
    Argument,
    /// `r<i>:`
    Register,
}

impl Slot {
    /// Line marker character
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Argument => 'a',
            Self::Register => 'r',
        }
    }

    fn from_line(text: &str) -> Option<Self> {
        match text.as_bytes().first() {
            Some(b'a') => Some(Self::Argument),
            Some(b'r') => Some(Self::Register),
            _ => None,
        }
    }
}

/// One `a<i>:<value>` or `r<i>:<value>` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedWrite {
    /// Target store
    pub slot: Slot,
    /// Slot index
    pub index: usize,
    /// Everything after the first `:`, possibly empty
    pub value: String,
}

impl IndexedWrite {
    fn parse(slot: Slot, line: &Line<'_>) -> TraceResult<Self> {
        let malformed = || FormatError::MalformedIndexedLine {
            line: line.number,
            content: line.text.to_string(),
        };

        // The marker is a single ASCII byte.
        let (index, value) = line.text[1..].split_once(':').ok_or_else(malformed)?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let index: u64 = index.parse().map_err(|_| malformed())?;

        Ok(Self {
            slot,
            index: check_slot_limit(index, line.number)?,
            value: value.to_string(),
        })
    }
}

/// Everything one block states, before inheritance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBlock {
    /// Tier from the header
    pub frame_type: FrameType,
    /// Field lines present in the block
    pub fields: FieldValues,
    /// Indexed value lines, in input order
    pub writes: Vec<IndexedWrite>,
}

impl ParsedBlock {
    /// Parse the body of a block.
    ///
    /// Field lines are optional but must follow [`Field::ORDER`]. Indexed
    /// lines for arguments and registers follow in any order.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] for a bad integer, a negative or oversized
    /// count, a malformed indexed line, or any other line left over.
    pub fn parse(block: &Block<'_>) -> TraceResult<Self> {
        let mut lines = block.body.iter().peekable();
        let mut fields = FieldValues::default();

        for field in Field::ORDER {
            if let Some(line) = lines.next_if(|line| line.text.starts_with(field.prefix())) {
                fields.set(field, &line.text[field.prefix().len()..], line.number)?;
            }
        }

        let writes = lines
            .map(|line| match Slot::from_line(line.text) {
                Some(slot) => IndexedWrite::parse(slot, line),
                None => Err(FormatError::UnexpectedLine {
                    line: line.number,
                    content: line.text.to_string(),
                }),
            })
            .collect::<TraceResult<Vec<_>>>()?;

        Ok(Self {
            frame_type: block.frame_type,
            fields,
            writes,
        })
    }
}
