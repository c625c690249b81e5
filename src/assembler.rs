//! The assembler: builder-style instruction emission and the compile pass.
//!
//! One method per mnemonic/directive.  Each call appends cells to the
//! bytecode stream and advances the instruction pointer by exactly the
//! number of bytes the encoded form will occupy — the stream interleaves
//! concrete bytes with label placeholders, and [`Assembler::compile`]
//! resolves everything against the label table in a single pass.

#[allow(unused_imports)]
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::cell::{Cell, Half};
use crate::error::AsmError;
use crate::labels::LabelTable;
use crate::reg::Register;

/// The fixed load origin: offset 0x100, where a DOS-style COM image is
/// loaded after the program segment prefix.
pub const ORIGIN: u16 = 0x100;

// ─── Truncation primitives ─────────────────────────────────

/// Truncate a value to its low byte.
///
/// Oversized immediates are masked, never rejected — the one place the
/// silent-truncation convention lives.
pub(crate) fn low_byte(value: u16) -> u8 {
    (value & 0x00FF) as u8
}

/// The high byte of a 16-bit value.
pub(crate) fn high_byte(value: u16) -> u8 {
    (value >> 8) as u8
}

// ─── Assembler ─────────────────────────────────────────────

/// Builder-pattern 8086 real-mode assembler.
///
/// Accumulates a mixed raw/placeholder bytecode stream through one method
/// call per mnemonic, then flattens it with [`compile`](Assembler::compile).
/// A single instance owns all of its state; it is not meant to be shared
/// between threads.
///
/// # Examples
///
/// ```
/// use asm8086::{Assembler, Register};
///
/// let mut asm = Assembler::new();
/// asm.jmp("start");
/// asm.nop();
/// asm.label("start");
/// asm.mov(Register::AX, 0x1234);
///
/// let bytes = asm.compile()?;
/// assert_eq!(bytes, vec![0xEB, 0x03, 0x90, 0xB8, 0x34, 0x12]);
/// # Ok::<(), asm8086::AsmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Assembler {
    ip: u16,
    stream: Vec<Cell>,
    labels: LabelTable,
    bin_length: usize,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// Create an empty assembler with the instruction pointer at
    /// [`ORIGIN`] (0x100).
    #[must_use]
    pub fn new() -> Self {
        Self {
            ip: ORIGIN,
            stream: Vec::new(),
            labels: LabelTable::new(),
            bin_length: 0,
        }
    }

    // ── stream bookkeeping ─────────────────────────────────

    /// Append one cell and advance the instruction pointer by one.
    ///
    /// Every cell stands for exactly one output byte, so this is the only
    /// place the instruction pointer moves: `ip == ORIGIN + stream.len()`
    /// holds at every point.
    fn push_cell(&mut self, cell: Cell) {
        self.stream.push(cell);
        self.ip = self.ip.wrapping_add(1);
    }

    fn byte(&mut self, b: u8) {
        self.push_cell(Cell::Byte(b));
    }

    /// Append a 16-bit absolute-address placeholder as two cells.
    fn fixup16(&mut self, label: &str) {
        self.push_cell(Cell::Fixup16(String::from(label), Half::Low));
        self.push_cell(Cell::Fixup16(String::from(label), Half::High));
    }

    /// Shared form of every relative short jump: the displacement base is
    /// the instruction pointer *before* the opcode byte is appended — the
    /// start of the jump instruction, not the 8086's usual next-instruction
    /// address.  Preserved exactly from the reference behavior.
    fn rel_jump(&mut self, opcode: u8, label: &str) {
        let origin = self.ip;
        self.byte(opcode);
        self.push_cell(Cell::FixupRel8 {
            origin,
            label: String::from(label),
        });
    }

    // ── instructions ───────────────────────────────────────

    /// `NOP` — encoding: `90`.
    pub fn nop(&mut self) {
        self.byte(0x90);
    }

    /// `INT vector` — software interrupt, encoding: `CD vv`.
    pub fn int(&mut self, vector: u8) {
        self.byte(0xCD);
        self.byte(vector);
    }

    /// `MOV reg, imm` — move immediate to register.
    ///
    /// Encodes `B0|code` followed by the low immediate byte; a 16-bit-class
    /// register (width bit set in its code) takes a second, high byte.  The
    /// immediate is silently masked to the register's width.
    ///
    /// # Examples
    ///
    /// ```
    /// use asm8086::{Assembler, Register};
    ///
    /// let mut asm = Assembler::new();
    /// asm.mov(Register::BL, 0x07);    // B3 07
    /// asm.mov(Register::CX, 0xBEEF);  // B9 EF BE
    /// assert_eq!(asm.compile()?, vec![0xB3, 0x07, 0xB9, 0xEF, 0xBE]);
    /// # Ok::<(), asm8086::AsmError>(())
    /// ```
    pub fn mov(&mut self, reg: Register, imm: u16) {
        self.byte(0xB0 | reg.code());
        self.byte(low_byte(imm));
        if reg.is_word() {
            self.byte(high_byte(imm));
        }
    }

    /// `MOV reg, label` — move a label's address into a register.
    ///
    /// Always emits the 16-bit addressing form (a resolved address is a
    /// full 16-bit offset), so the destination must be a word register.
    ///
    /// # Errors
    ///
    /// [`AsmError::InvalidOperand`] for a byte register.
    pub fn mov_label(&mut self, reg: Register, label: &str) -> Result<(), AsmError> {
        reg.require_word("mov with a label operand")?;
        self.byte(0xB0 | reg.code());
        self.fixup16(label);
        Ok(())
    }

    /// `JMP disp` — unconditional short jump to a literal displacement,
    /// encoding: `EB dd`.
    pub fn jmp_rel(&mut self, disp: i8) {
        self.byte(0xEB);
        self.byte(disp as u8);
    }

    /// `JMP label` — unconditional short jump to a label.
    ///
    /// The displacement resolves to `address(label) - origin` where
    /// `origin` is the address of the jump's own opcode byte (see
    /// [`Cell::FixupRel8`]), wrapped to a byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use asm8086::Assembler;
    ///
    /// let mut asm = Assembler::new();
    /// asm.jmp("next");     // origin 0x100
    /// asm.label("next");   // 0x102
    /// assert_eq!(asm.compile()?, vec![0xEB, 0x02]);
    /// # Ok::<(), asm8086::AsmError>(())
    /// ```
    pub fn jmp(&mut self, label: &str) {
        self.rel_jump(0xEB, label);
    }

    /// `JE label` — jump if equal, encoding: `74 dd`.
    pub fn je(&mut self, label: &str) {
        self.rel_jump(0x74, label);
    }

    /// `JNE label` — jump if not equal, encoding: `75 dd`.
    pub fn jne(&mut self, label: &str) {
        self.rel_jump(0x75, label);
    }

    /// `JL label` — jump if less (signed), encoding: `7C dd`.
    pub fn jl(&mut self, label: &str) {
        self.rel_jump(0x7C, label);
    }

    /// `JGE label` — jump if greater or equal (signed), encoding: `7D dd`.
    pub fn jge(&mut self, label: &str) {
        self.rel_jump(0x7D, label);
    }

    /// `JLE label` — jump if less or equal (signed), encoding: `7E dd`.
    pub fn jle(&mut self, label: &str) {
        self.rel_jump(0x7E, label);
    }

    /// `JG label` — jump if greater (signed), encoding: `7F dd`.
    pub fn jg(&mut self, label: &str) {
        self.rel_jump(0x7F, label);
    }

    /// `INC reg` — increment a 16-bit register, encoding: `40+reg`.
    ///
    /// # Errors
    ///
    /// [`AsmError::InvalidOperand`] for a byte register.
    pub fn inc(&mut self, reg: Register) -> Result<(), AsmError> {
        reg.require_word("inc")?;
        self.byte(0x40 | reg.reg_field());
        Ok(())
    }

    /// `DEC reg` — decrement a 16-bit register, encoding: `48+reg`.
    ///
    /// # Errors
    ///
    /// [`AsmError::InvalidOperand`] for a byte register.
    pub fn dec(&mut self, reg: Register) -> Result<(), AsmError> {
        reg.require_word("dec")?;
        self.byte(0x48 | reg.reg_field());
        Ok(())
    }

    /// `PUSH reg` — push a 16-bit register, encoding: `50+reg`.
    ///
    /// # Errors
    ///
    /// [`AsmError::InvalidOperand`] for a byte register.
    pub fn push(&mut self, reg: Register) -> Result<(), AsmError> {
        reg.require_word("push")?;
        self.byte(0x50 | reg.reg_field());
        Ok(())
    }

    /// `POP reg` — pop into a 16-bit register, encoding: `58+reg`.
    ///
    /// # Errors
    ///
    /// [`AsmError::InvalidOperand`] for a byte register.
    pub fn pop(&mut self, reg: Register) -> Result<(), AsmError> {
        reg.require_word("pop")?;
        self.byte(0x58 | reg.reg_field());
        Ok(())
    }

    /// `CMP reg, imm` — compare register against an immediate.
    ///
    /// Byte registers use the `80 /7 ib` form, word registers `81 /7 iw`;
    /// the immediate is masked to the register's width.
    pub fn cmp(&mut self, reg: Register, imm: u16) {
        if reg.is_word() {
            self.byte(0x81);
            self.byte(0xF8 | reg.reg_field());
            self.byte(low_byte(imm));
            self.byte(high_byte(imm));
        } else {
            self.byte(0x80);
            self.byte(0xF8 | reg.reg_field());
            self.byte(low_byte(imm));
        }
    }

    /// `ADD dst, src` — register-to-register addition (`00 /r` byte form,
    /// `01 /r` word form).
    ///
    /// # Errors
    ///
    /// [`AsmError::InvalidOperand`] when the register widths differ.
    pub fn add(&mut self, dst: Register, src: Register) -> Result<(), AsmError> {
        if dst.is_word() != src.is_word() {
            return Err(AsmError::InvalidOperand {
                detail: format!("add operand widths differ: {} vs {}", dst, src),
            });
        }
        self.byte(if dst.is_word() { 0x01 } else { 0x00 });
        self.byte(0xC0 | (src.reg_field() << 3) | dst.reg_field());
        Ok(())
    }

    /// `ADD reg, imm` — register-immediate addition (`80 /0 ib` byte form,
    /// `81 /0 iw` word form); the immediate is masked to the register's
    /// width.
    pub fn add_imm(&mut self, reg: Register, imm: u16) {
        if reg.is_word() {
            self.byte(0x81);
            self.byte(0xC0 | reg.reg_field());
            self.byte(low_byte(imm));
            self.byte(high_byte(imm));
        } else {
            self.byte(0x80);
            self.byte(0xC0 | reg.reg_field());
            self.byte(low_byte(imm));
        }
    }

    // ── directives ─────────────────────────────────────────

    /// Declare `name` at the current instruction pointer.
    ///
    /// Redeclaring a name silently overwrites its address; references
    /// resolved afterwards use the later declaration.
    pub fn label(&mut self, name: &str) {
        self.labels.declare(name, self.ip);
    }

    /// Declare a literal ASCII data/string run, emitted byte-for-byte.
    ///
    /// # Errors
    ///
    /// [`AsmError::InvalidOperand`] if `text` contains a non-ASCII byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use asm8086::Assembler;
    ///
    /// let mut asm = Assembler::new();
    /// asm.data("AB")?;
    /// asm.data("CD")?;
    /// assert_eq!(asm.compile()?, vec![0x41, 0x42, 0x43, 0x44]);
    /// # Ok::<(), asm8086::AsmError>(())
    /// ```
    pub fn data(&mut self, text: &str) -> Result<(), AsmError> {
        if !text.is_ascii() {
            return Err(AsmError::InvalidOperand {
                detail: String::from("data declaration must be ASCII"),
            });
        }
        for b in text.bytes() {
            self.push_cell(Cell::Text(b));
        }
        Ok(())
    }

    /// Declare raw bytes, emitted verbatim.
    pub fn db(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.byte(b);
        }
    }

    /// Declare the low byte of a label's address (8-bit absolute fixup).
    pub fn db_label(&mut self, label: &str) {
        self.push_cell(Cell::Fixup8(String::from(label)));
    }

    /// Declare a label's full 16-bit address, little-endian.
    pub fn dw_label(&mut self, label: &str) {
        self.fixup16(label);
    }

    // ── OS conveniences ────────────────────────────────────

    /// Terminate the program via DOS (`MOV AH, 4Ch; INT 21h`).
    pub fn exit(&mut self) {
        self.mov(Register::AH, 0x4C);
        self.int(0x21);
    }

    /// Terminate the program via DOS with an explicit return code
    /// (`MOV AX, 4C00h|code; INT 21h`).
    pub fn exit_code(&mut self, code: u8) {
        self.mov(Register::AX, 0x4C00 | u16::from(code));
        self.int(0x21);
    }

    /// Print one character via DOS (`MOV AH, 02h; MOV DL, ch; INT 21h`).
    pub fn print_char(&mut self, ch: u8) {
        self.mov(Register::AH, 0x02);
        self.mov(Register::DL, u16::from(ch));
        self.int(0x21);
    }

    // ── accessors ──────────────────────────────────────────

    /// The current instruction pointer — the load address of the next
    /// emitted byte.
    #[must_use]
    pub fn ip(&self) -> u16 {
        self.ip
    }

    /// Read-only view of the uncompiled cell stream, for diagnostics.
    #[must_use]
    pub fn bytecode(&self) -> &[Cell] {
        &self.stream
    }

    /// The label table.
    #[must_use]
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Length of the last compiled image, in bytes.  Zero until
    /// [`compile`](Assembler::compile) has succeeded.  The header-building
    /// collaborator treats this as an opaque input.
    #[must_use]
    pub fn bin_length(&self) -> usize {
        self.bin_length
    }

    /// Human-readable dump of the uncompiled stream: one cell per line,
    /// prefixed with its load address.
    ///
    /// ```text
    /// 0100  235
    /// 0101  rel8(0x0100->START)
    /// 0102  fixup16.lo(DATA)
    /// ```
    #[must_use]
    pub fn dump(&self) -> String {
        use core::fmt::Write;

        let mut out = String::new();
        for (i, cell) in self.stream.iter().enumerate() {
            let addr = ORIGIN.wrapping_add(i as u16);
            let _ = writeln!(out, "{:04X}  {}", addr, cell);
        }
        out
    }

    // ── compilation ────────────────────────────────────────

    /// Resolve every placeholder against the label table and flatten the
    /// stream into the final byte image.
    ///
    /// Single linear pass; the stream and table are not consumed, so
    /// compiling twice from the same state re-derives the same bytes.
    /// Records the image length for [`bin_length`](Assembler::bin_length).
    ///
    /// # Errors
    ///
    /// [`AsmError::UnresolvedLabel`] on the first reference to an
    /// undeclared label — no partial image is ever produced.
    pub fn compile(&mut self) -> Result<Vec<u8>, AsmError> {
        let mut out = Vec::with_capacity(self.stream.len());
        for cell in &self.stream {
            match cell {
                Cell::Byte(b) | Cell::Text(b) => out.push(*b),
                Cell::Fixup8(label) => out.push(low_byte(self.labels.resolve(label)?)),
                Cell::Fixup16(label, Half::Low) => {
                    out.push(low_byte(self.labels.resolve(label)?));
                }
                Cell::Fixup16(label, Half::High) => {
                    out.push(high_byte(self.labels.resolve(label)?));
                }
                Cell::FixupRel8 { origin, label } => {
                    let target = self.labels.resolve(label)?;
                    out.push(low_byte(target.wrapping_sub(*origin)));
                }
            }
        }
        self.bin_length = out.len();
        Ok(out)
    }
}
