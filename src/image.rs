//! Executable-image construction and file output.
//!
//! The core assembler produces a flat byte sequence; this module wraps it
//! for persistent storage — either verbatim (a DOS-style `.COM`/flat
//! binary) or behind a fixed-layout MZ header whose page and paragraph
//! counts are derived from the recorded image length.  The header builder
//! treats `bin_length` as an opaque input: it never recompiles or measures
//! the payload itself.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::assembler::Assembler;
use crate::error::AsmError;

/// Requested on-disk executable format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExeFormat {
    /// Flat binary — the compiled bytes verbatim (`.COM`/`.BIN`).
    Flat,
    /// MZ-headered executable.
    Mz,
}

/// Error from image construction or file output.
///
/// This is the only place I/O failures surface; the core assembler never
/// performs I/O.
#[derive(Debug)]
pub enum ImageError {
    /// Compilation failed — see [`AsmError`].
    Asm(AsmError),
    /// Writing the output file failed.
    Io(io::Error),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Asm(e) => write!(f, "assembly failed: {}", e),
            ImageError::Io(e) => write!(f, "i/o failure: {}", e),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Asm(e) => Some(e),
            ImageError::Io(e) => Some(e),
        }
    }
}

impl From<AsmError> for ImageError {
    fn from(e: AsmError) -> Self {
        ImageError::Asm(e)
    }
}

impl From<io::Error> for ImageError {
    fn from(e: io::Error) -> Self {
        ImageError::Io(e)
    }
}

/// Size of the MZ header emitted by [`mz_header`], in bytes.
pub const MZ_HEADER_LEN: usize = 29;

/// Build the fixed-layout MZ header for an image of `bin_length` bytes.
///
/// Field arithmetic follows the reference layout: last-page byte count is
/// the low byte of `len % 512`, the page count is `len / 512 + 1`, and the
/// requested/required paragraph counts are the low byte of
/// `len / 16 + len % 16`.  The checksum field carries the low byte of the
/// length; SS, SP, IP, CS, and the relocation fields are zeroed.
#[must_use]
pub fn mz_header(bin_length: usize) -> Vec<u8> {
    let lo = |v: usize| (v & 0xFF) as u8;
    let paragraphs = lo(bin_length / 16 + bin_length % 16);

    let mut header = Vec::with_capacity(MZ_HEADER_LEN);
    header.extend_from_slice(b"MZ"); // 0x00: magic
    header.extend_from_slice(&[lo(bin_length % 512), 0x00]); // 0x02: bytes in last page
    header.extend_from_slice(&[lo(bin_length / 512 + 1), 0x00]); // 0x04: page count
    header.extend_from_slice(&[0x00, 0x00]); // 0x06: relocation entries
    header.extend_from_slice(&[0x1C + 1, 0x00]); // 0x08: header size
    header.extend_from_slice(&[paragraphs, 0x00]); // 0x0A: required paragraphs
    header.extend_from_slice(&[paragraphs, 0x00]); // 0x0C: requested paragraphs
    header.extend_from_slice(&[0x00, 0x00]); // 0x0E: initial SS
    header.extend_from_slice(&[0x00, 0x00]); // 0x10: initial SP
    header.extend_from_slice(&[lo(bin_length), 0x00]); // 0x12: checksum
    header.extend_from_slice(&[0x00, 0x00]); // 0x14: initial IP
    header.extend_from_slice(&[0x00, 0x00]); // 0x16: initial CS
    header.extend_from_slice(&[0x00, 0x00]); // 0x18: relocation table offset
    header.extend_from_slice(&[0x00, 0x00]); // 0x1A: overlay number
    header.push(0x00); // 0x1C: overlay information
    header
}

impl Assembler {
    /// Compile and return the complete on-disk image for `format`.
    ///
    /// # Errors
    ///
    /// [`AsmError::UnresolvedLabel`] if compilation fails; no image is
    /// produced.
    pub fn build_image(&mut self, format: ExeFormat) -> Result<Vec<u8>, AsmError> {
        let payload = self.compile()?;
        let mut image = match format {
            ExeFormat::Flat => Vec::with_capacity(payload.len()),
            ExeFormat::Mz => mz_header(self.bin_length()),
        };
        image.extend_from_slice(&payload);
        Ok(image)
    }

    /// Compile and write the image to `path`.
    ///
    /// # Errors
    ///
    /// [`ImageError::Asm`] on resolution failure, [`ImageError::Io`] on
    /// file errors.
    pub fn write_bin_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: ExeFormat,
    ) -> Result<(), ImageError> {
        let image = self.build_image(format)?;
        let mut file = File::create(path)?;
        file.write_all(&image)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reg::Register;

    #[test]
    fn mz_header_layout() {
        let header = mz_header(600);
        assert_eq!(header.len(), MZ_HEADER_LEN);
        assert_eq!(&header[0..2], b"MZ");
        assert_eq!(header[2], (600 % 512) as u8); // 88 bytes in last page
        assert_eq!(header[4], (600 / 512 + 1) as u8); // 2 pages
        assert_eq!(header[8], 0x1D); // header size
        assert_eq!(header[10], ((600 / 16 + 600 % 16) & 0xFF) as u8);
        assert_eq!(header[10], header[12]);
        assert_eq!(header[18], (600 & 0xFF) as u8); // checksum byte
    }

    #[test]
    fn flat_image_is_payload_verbatim() {
        let mut asm = Assembler::new();
        asm.nop();
        asm.int(0x20);
        let image = asm.build_image(ExeFormat::Flat).unwrap();
        assert_eq!(image, vec![0x90, 0xCD, 0x20]);
    }

    #[test]
    fn mz_image_prepends_header_from_recorded_length() {
        let mut asm = Assembler::new();
        asm.mov(Register::AX, 0x4C00);
        asm.int(0x21);
        let image = asm.build_image(ExeFormat::Mz).unwrap();
        assert_eq!(image.len(), MZ_HEADER_LEN + 5);
        assert_eq!(&image[0..2], b"MZ");
        assert_eq!(image[2], 5); // 5 bytes in last page
        assert_eq!(&image[MZ_HEADER_LEN..], &[0xB8, 0x00, 0x4C, 0xCD, 0x21]);
        assert_eq!(asm.bin_length(), 5);
    }

    #[test]
    fn unresolved_label_yields_no_image() {
        let mut asm = Assembler::new();
        asm.jmp("NOWHERE");
        let err = asm.build_image(ExeFormat::Mz).unwrap_err();
        assert_eq!(
            err,
            AsmError::UnresolvedLabel {
                label: "NOWHERE".into()
            }
        );
    }
}
