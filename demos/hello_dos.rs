//! DOS hello-world demo — builds a `.COM` program with the builder API.
//!
//! Run with: `cargo run --example hello_dos`

use asm8086::{Assembler, ExeFormat, Register};

fn main() {
    let mut asm = Assembler::new();

    asm.print_char(b'A');
    asm.jmp("START");
    asm.exit();
    asm.label("START");
    asm.print_char(b'B');
    asm.mov(Register::AH, 0x09); // DOS: print '$'-terminated string
    asm.mov_label(Register::DX, "DATA").unwrap();
    asm.int(0x21);
    asm.exit();
    asm.label("DATA");
    asm.data("\r\nHELLO WORLD$").unwrap();

    // The uncompiled stream: raw bytes interleaved with placeholders.
    println!("=== bytecode stream ===");
    print!("{}", asm.dump());

    // Labels as resolved at declaration time.
    println!("\n=== labels ===");
    for (name, addr) in asm.labels().iter() {
        println!("{}: 0x{:04X}", name, addr);
    }

    // The flattened image.
    let bytes = asm.compile().unwrap();
    println!("\n=== compiled ({} bytes) ===", asm.bin_length());
    for (i, chunk) in bytes.chunks(16).enumerate() {
        print!("{:04X} ", 0x100 + i * 16);
        for b in chunk {
            print!(" {:02X}", b);
        }
        println!();
    }

    asm.write_bin_file("TEST.COM", ExeFormat::Flat).unwrap();
    println!("\nwrote TEST.COM");
}
