//! 8086 register operands and their encoding codes.
//!
//! Registers are encoded as small integer codes: the 8-bit registers occupy
//! `0x00..=0x07`, the 16-bit registers `0x08..=0x0F`.  Bit 3 is the width
//! bit — the emitter decides from the code alone whether a 16-bit immediate
//! must follow an opcode byte.  The low three bits are the hardware `reg`
//! field used in opcode+reg and ModR/M encodings.

use core::fmt;

use crate::error::AsmError;

/// An 8086 general-purpose register operand.
///
/// The discriminants are the operand codes used throughout the emitter.
///
/// # Examples
///
/// ```
/// use asm8086::Register;
///
/// assert_eq!(Register::AL.code(), 0x00);
/// assert_eq!(Register::AX.code(), 0x08);
/// assert!(Register::AX.is_word());
/// assert!(!Register::DL.is_word());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Register {
    /// AL — accumulator, low byte.
    AL = 0x00,
    /// CL — counter, low byte.
    CL = 0x01,
    /// DL — data, low byte.
    DL = 0x02,
    /// BL — base, low byte.
    BL = 0x03,
    /// AH — accumulator, high byte.
    AH = 0x04,
    /// CH — counter, high byte.
    CH = 0x05,
    /// DH — data, high byte.
    DH = 0x06,
    /// BH — base, high byte.
    BH = 0x07,
    /// AX — 16-bit accumulator.
    AX = 0x08,
    /// CX — 16-bit counter.
    CX = 0x09,
    /// DX — 16-bit data.
    DX = 0x0A,
    /// BX — 16-bit base.
    BX = 0x0B,
    /// SP — stack pointer.
    SP = 0x0C,
    /// BP — base pointer.
    BP = 0x0D,
    /// SI — source index.
    SI = 0x0E,
    /// DI — destination index.
    DI = 0x0F,
}

/// The width bit: set on every 16-bit register code.
const WIDE_BIT: u8 = 0x08;

impl Register {
    /// The raw operand code (`0x00..=0x0F`).
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The hardware `reg` field — the low three bits of the code.
    #[must_use]
    pub fn reg_field(self) -> u8 {
        self.code() & 0x07
    }

    /// Whether this is a 16-bit register (bit 3 of the code).
    #[must_use]
    pub fn is_word(self) -> bool {
        self.code() & WIDE_BIT != 0
    }

    /// Fail-fast guard for forms that only encode 16-bit registers.
    pub(crate) fn require_word(self, mnemonic: &str) -> Result<(), AsmError> {
        if self.is_word() {
            Ok(())
        } else {
            Err(AsmError::InvalidOperand {
                detail: alloc::format!("{} requires a 16-bit register, got {}", mnemonic, self),
            })
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::AL => "AL",
            Register::CL => "CL",
            Register::DL => "DL",
            Register::BL => "BL",
            Register::AH => "AH",
            Register::CH => "CH",
            Register::DH => "DH",
            Register::BH => "BH",
            Register::AX => "AX",
            Register::CX => "CX",
            Register::DX => "DX",
            Register::BX => "BX",
            Register::SP => "SP",
            Register::BP => "BP",
            Register::SI => "SI",
            Register::DI => "DI",
        };
        f.write_str(name)
    }
}

impl TryFrom<u8> for Register {
    type Error = AsmError;

    /// Recover a register from its raw operand code.
    ///
    /// Codes above `0x0F` are outside the encodable domain.
    fn try_from(code: u8) -> Result<Self, AsmError> {
        Ok(match code {
            0x00 => Register::AL,
            0x01 => Register::CL,
            0x02 => Register::DL,
            0x03 => Register::BL,
            0x04 => Register::AH,
            0x05 => Register::CH,
            0x06 => Register::DH,
            0x07 => Register::BH,
            0x08 => Register::AX,
            0x09 => Register::CX,
            0x0A => Register::DX,
            0x0B => Register::BX,
            0x0C => Register::SP,
            0x0D => Register::BP,
            0x0E => Register::SI,
            0x0F => Register::DI,
            _ => {
                return Err(AsmError::InvalidOperand {
                    detail: alloc::format!("register code 0x{:02X} out of range", code),
                })
            }
        })
    }
}
