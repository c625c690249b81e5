//! Whole-program tests: label resolution across realistic instruction
//! sequences, stream/image length accounting, and failure behavior.

use asm8086::{Assembler, AsmError, Cell, Register, ORIGIN};

#[test]
fn output_length_equals_cell_count() {
    let mut asm = Assembler::new();
    asm.nop();
    asm.int(0x21);
    asm.mov(Register::AX, 0xFFFF);
    asm.mov_label(Register::DX, "D").unwrap();
    asm.jmp("D");
    asm.cmp(Register::CX, 7);
    asm.label("D");
    asm.data("HELLO$").unwrap();

    let cells = asm.bytecode().len();
    let bytes = asm.compile().unwrap();
    assert_eq!(bytes.len(), cells);
    assert_eq!(asm.bin_length(), cells);
    assert_eq!(asm.ip(), ORIGIN + cells as u16);
}

/// A forward reference (use before declaration) and a backward reference
/// (use after declaration) to the same label resolve to the same operand
/// bytes.
#[test]
fn forward_and_backward_references_agree() {
    let mut asm = Assembler::new();
    asm.mov_label(Register::DX, "TARGET").unwrap(); // forward: 0x100..0x103
    asm.label("TARGET"); // 0x103
    asm.mov_label(Register::BX, "TARGET").unwrap(); // backward: 0x103..0x106

    let bytes = asm.compile().unwrap();
    assert_eq!(bytes, vec![0xBA, 0x03, 0x01, 0xBB, 0x03, 0x01]);
    // Identical resolved address word in both directions.
    assert_eq!(&bytes[1..3], &bytes[4..6]);
}

/// A default-constructed assembler is indistinguishable from `new()`: it
/// starts at ORIGIN, so labels resolve to the same addresses either way.
#[test]
fn default_construction_matches_new() {
    let mut from_default = Assembler::default();
    let mut from_new = Assembler::new();
    for asm in [&mut from_default, &mut from_new] {
        asm.jmp("MSG");
        asm.label("MSG");
        asm.mov_label(Register::DX, "MSG").unwrap();
    }
    assert_eq!(from_default.ip(), from_new.ip());
    assert_eq!(
        from_default.compile().unwrap(),
        from_new.compile().unwrap()
    );
    assert_eq!(from_default.labels().resolve("MSG").unwrap(), 0x102);
}

/// The §-documented round trip: NOP; INT 21h; MOV AX, imm8; HELLO:;
/// MOV DX, HELLO.
#[test]
fn documented_round_trip() {
    let mut asm = Assembler::new();
    asm.nop(); // 0x100: 90
    asm.int(0x21); // 0x101: CD 21
    asm.mov(Register::AX, 0x08); // 0x103: B8 08 00
    asm.label("HELLO"); // 0x106
    asm.mov_label(Register::DX, "HELLO").unwrap(); // BA 06 01

    let bytes = asm.compile().unwrap();
    assert_eq!(
        bytes,
        vec![0x90, 0xCD, 0x21, 0xB8, 0x08, 0x00, 0xBA, 0x06, 0x01]
    );
    assert_eq!(asm.labels().resolve("HELLO").unwrap(), 0x106);
}

#[test]
fn jmp_to_next_label_displacement() {
    let mut asm = Assembler::new();
    asm.jmp("NEXT"); // origin 0x100, cells at 0x100..0x102
    asm.label("NEXT"); // 0x102
    let bytes = asm.compile().unwrap();
    let origin = 0x100u16;
    let label_ip = asm.labels().resolve("NEXT").unwrap();
    assert_eq!(bytes[1], (label_ip - origin) as u8);
}

#[test]
fn unresolved_label_is_fatal() {
    let mut asm = Assembler::new();
    asm.nop();
    asm.jmp("MISSING");
    let err = asm.compile().unwrap_err();
    assert_eq!(
        err,
        AsmError::UnresolvedLabel {
            label: "MISSING".into()
        }
    );
    // No partial image was recorded.
    assert_eq!(asm.bin_length(), 0);
}

#[test]
fn label_redeclaration_uses_latest_address() {
    let mut asm = Assembler::new();
    asm.label("L"); // 0x100
    asm.nop();
    asm.label("L"); // overwritten: 0x101
    asm.mov_label(Register::BX, "L").unwrap();
    let bytes = asm.compile().unwrap();
    assert_eq!(bytes, vec![0x90, 0xBB, 0x01, 0x01]);
}

/// Emission after a compile stays valid: the stream is not consumed and a
/// later compile sees the appended instructions.
#[test]
fn emission_after_compile_extends_stream() {
    let mut asm = Assembler::new();
    asm.nop();
    assert_eq!(asm.compile().unwrap(), vec![0x90]);
    asm.int(0x20);
    assert_eq!(asm.compile().unwrap(), vec![0x90, 0xCD, 0x20]);
    assert_eq!(asm.bin_length(), 3);
}

/// The diagnostic stream view exposes placeholders by tag until compiled.
#[test]
fn bytecode_view_shows_placeholders() {
    let mut asm = Assembler::new();
    asm.jmp("START");
    asm.label("START");
    let stream = asm.bytecode();
    assert_eq!(stream[0], Cell::Byte(0xEB));
    assert!(stream[1].is_fixup());
    assert_eq!(stream[1].to_string(), "rel8(0x0100->START)");

    // Compiling does not alter the stream.
    asm.compile().unwrap();
    assert!(asm.bytecode()[1].is_fixup());
}

/// The original driver program: print 'A', jump over an exit, print 'B',
/// print a string via DOS, exit, trailing data.
#[test]
fn hello_world_program() {
    let mut asm = Assembler::new();
    asm.print_char(b'A'); // 0x100: B4 02 B2 41 CD 21
    asm.jmp("START"); // 0x106: EB ..
    asm.exit(); // 0x108: B4 4C CD 21
    asm.label("START"); // 0x10C
    asm.print_char(b'B'); // 0x10C: B4 02 B2 42 CD 21
    asm.mov(Register::AH, 0x09); // 0x112: B4 09
    asm.mov_label(Register::DX, "DATA").unwrap(); // 0x114: BA .. ..
    asm.int(0x21); // 0x117: CD 21
    asm.exit(); // 0x119: B4 4C CD 21
    asm.label("DATA"); // 0x11D
    asm.data("\r\nHELLO WORLD$").unwrap();

    let bytes = asm.compile().unwrap();

    // JMP opcode at 0x106 targets START at 0x10C: displacement 0x06.
    assert_eq!(bytes[6], 0xEB);
    assert_eq!(bytes[7], 0x06);
    // MOV DX, DATA resolves to 0x011D little-endian.
    assert_eq!(&bytes[0x14..0x17], &[0xBA, 0x1D, 0x01]);
    // Trailing data is verbatim ASCII ending in the DOS string terminator.
    assert_eq!(bytes[bytes.len() - 1], b'$');
    assert_eq!(&bytes[bytes.len() - 13..], b"\nHELLO WORLD$");
    assert_eq!(asm.bin_length(), bytes.len());
}
