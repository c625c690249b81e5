//! # asm8086 — Programmatic 8086 Real-Mode Assembler
//!
//! `asm8086` is a builder-style assembler for 8086 real-mode machine code:
//! one method call per mnemonic or directive, accumulated into a mixed
//! stream of concrete bytes and label placeholders, resolved in a single
//! compile pass into a flat binary image loadable at origin `0x100`.
//!
//! ## Quick Start
//!
//! ```rust
//! use asm8086::{Assembler, Register};
//!
//! let mut asm = Assembler::new();
//! asm.mov(Register::AH, 0x09);
//! asm.mov_label(Register::DX, "MSG").unwrap();
//! asm.int(0x21);
//! asm.exit();
//! asm.label("MSG");
//! asm.data("HELLO$").unwrap();
//!
//! let bytes = asm.compile().unwrap();
//! assert_eq!(&bytes[..2], &[0xB4, 0x09]);       // mov ah, 09h
//! assert_eq!(&bytes[2..5], &[0xBA, 0x0B, 0x01]); // mov dx, 0x010B
//! ```
//!
//! ## Features
//!
//! - **Forward references** — labels may be used before they are declared;
//!   every symbolic operand becomes a tagged placeholder resolved at
//!   compile time.
//! - **Builder API only** — no text parsing; the assembler is driven
//!   programmatically, call by call.
//! - **`no_std` + `alloc`** — the core has no I/O; the executable-image
//!   writer (flat `.COM` or MZ-headered) sits behind the `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// ── Lint policy ──────────────────────────────────────────────────────────
// An assembler performs narrowing casts between integer widths by design
// and spells opcodes as dense hex literals; the lints below are expected.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::unreadable_literal,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// The assembler: emitter methods, instruction-pointer bookkeeping, and the
/// compile pass.
pub mod assembler;
/// Bytecode cell tagged union and its diagnostic rendering.
pub mod cell;
/// Error types.
pub mod error;
/// Executable-image construction (flat / MZ) and file output.
#[cfg(feature = "std")]
pub mod image;
/// The label table.
pub mod labels;
/// Register operands and encoding codes.
pub mod reg;

// Re-exports
pub use assembler::{Assembler, ORIGIN};
pub use cell::{Cell, Half};
pub use error::AsmError;
#[cfg(feature = "std")]
pub use image::{mz_header, ExeFormat, ImageError, MZ_HEADER_LEN};
pub use labels::LabelTable;
pub use reg::Register;
