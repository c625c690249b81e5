//! The bytecode cell — the tagged union the emitter appends and the
//! resolver consumes.
//!
//! Every cell stands for **exactly one** byte of the final image.  This is
//! the load-bearing invariant of the whole crate: the instruction pointer is
//! `ORIGIN + stream.len()` at all times, so a 16-bit fixup is appended as
//! two cells (low half, then high half) and a data declaration as one
//! [`Cell::Text`] per byte.  Placeholders carry the label name and are
//! resolved by pattern matching in a single pass — never by sniffing an
//! encoded string.

use alloc::string::String;
use core::fmt;

/// Which half of a 16-bit little-endian address a [`Cell::Fixup16`]
/// cell produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Half {
    /// The low byte (emitted first).
    Low,
    /// The high byte.
    High,
}

/// One cell of the bytecode stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    /// A concrete byte, output verbatim.
    Byte(u8),

    /// One byte of a literal data/string run, output verbatim.
    ///
    /// Kept distinct from [`Cell::Byte`] only so the diagnostic stream view
    /// shows where declared data starts — the resolver treats both the same.
    Text(u8),

    /// Unresolved 8-bit absolute address: the low byte of the label's
    /// resolved address.
    Fixup8(String),

    /// One half of an unresolved 16-bit absolute address.  The emitter
    /// always appends the `Low` cell immediately followed by the `High`
    /// cell for the same label.
    Fixup16(String, Half),

    /// Unresolved 8-bit relative displacement:
    /// `resolve(label) - origin`, truncated to a byte (wrapping).
    ///
    /// `origin` is the instruction pointer captured *before* the opcode
    /// byte of the jump was appended — the displacement base is the start
    /// of the jump instruction, not the conventional 8086 "IP after the
    /// instruction".
    FixupRel8 {
        /// Instruction pointer at the jump's opcode byte.
        origin: u16,
        /// The target label.
        label: String,
    },
}

impl Cell {
    /// Whether this cell still needs the label table to resolve.
    #[must_use]
    pub fn is_fixup(&self) -> bool {
        !matches!(self, Cell::Byte(_) | Cell::Text(_))
    }
}

impl fmt::Display for Cell {
    /// Diagnostic rendering: concrete bytes as unsigned 0–255, placeholders
    /// by tag and label.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Byte(b) | Cell::Text(b) => write!(f, "{}", b),
            Cell::Fixup8(label) => write!(f, "fixup8({})", label),
            Cell::Fixup16(label, Half::Low) => write!(f, "fixup16.lo({})", label),
            Cell::Fixup16(label, Half::High) => write!(f, "fixup16.hi({})", label),
            Cell::FixupRel8 { origin, label } => {
                write!(f, "rel8(0x{:04X}->{})", origin, label)
            }
        }
    }
}
