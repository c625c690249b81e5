//! Error types for emission and resolution.
//!
//! The taxonomy is deliberately small: forward references are legal, so the
//! only user-visible resolution failure is "the caller referenced a label
//! that was never declared".  Operand *values* are never errors — oversized
//! immediates are masked to their encoded width — but operand *shapes*
//! (a byte register where a word register is required) fail fast.

use alloc::string::String;
use core::fmt;

/// Assembly error.
///
/// I/O failures never appear here: the core performs no I/O.  The
/// executable-image writer in [`crate::image`] has its own error type that
/// wraps this one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsmError {
    /// A fixup referenced a label that was never declared by the time
    /// `compile` ran.  Compilation aborts with no partial output.
    UnresolvedLabel {
        /// The undeclared label name.
        label: String,
    },

    /// An operand fell outside the encodable domain for the chosen
    /// instruction form (e.g. a byte register passed to `push`).
    InvalidOperand {
        /// Description of why the operand is invalid.
        detail: String,
    },
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::UnresolvedLabel { label } => {
                write!(f, "unresolved label '{}'", label)
            }
            AsmError::InvalidOperand { detail } => {
                write!(f, "invalid operand: {}", detail)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AsmError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn unresolved_label_display() {
        let err = AsmError::UnresolvedLabel {
            label: "START".into(),
        };
        assert_eq!(format!("{}", err), "unresolved label 'START'");
    }

    #[test]
    fn invalid_operand_display() {
        let err = AsmError::InvalidOperand {
            detail: "push requires a 16-bit register, got AL".into(),
        };
        assert_eq!(
            format!("{}", err),
            "invalid operand: push requires a 16-bit register, got AL"
        );
    }
}
