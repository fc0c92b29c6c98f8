//! Barcode command frames
//!
//! ## 1D barcodes (GS k)
//!
//! Printed as three frames: module width/height, HRI font, then the payload.
//! Most types use the NUL-terminated form of GS k (function A). CODE128 only
//! exists in the length-prefixed form (function B), so it carries a length
//! byte and no terminator.
//!
//! ## 2D symbologies (GS ( k)
//!
//! QR, PDF417, Aztec and DataMatrix share one envelope:
//!
//! | Bytes | Meaning |
//! |-------|---------|
//! | `1D 28 6B` | GS ( k |
//! | `pL pH` | length of everything after pH, little-endian |
//! | `cn` | symbology |
//! | `fn` | function |
//! | ... | function parameters |
//!
//! Each symbol is set up and printed with a fixed sequence of sub-frames:
//! module size, (QR only) error correction, store data, print.

use crate::command::{GS, split_len};

/// Maximum CODE128 payload (one length byte)
pub const MAX_CODE128_LEN: usize = u8::MAX as usize;

/// Maximum 2D payload (pL/pH minus function bytes)
pub const MAX_2D_DATA_LEN: usize = u16::MAX as usize - 3;

/// Module size used when the requested one is out of range
pub const DEFAULT_MODULE_SIZE: u8 = 3;

/// 1D barcode symbology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeType {
    UpcA,
    UpcE,
    Ean13,
    Ean8,
    Code39,
    Itf,
    Codabar,
    Code128,
}

/// How the payload length is conveyed
enum Termination {
    Nul,
    LengthPrefix,
}

impl BarcodeType {
    /// The GS k `m` byte
    pub fn code(self) -> u8 {
        match self {
            BarcodeType::UpcA => 0x00,
            BarcodeType::UpcE => 0x01,
            BarcodeType::Ean13 => 0x02,
            BarcodeType::Ean8 => 0x03,
            BarcodeType::Code39 => 0x04,
            BarcodeType::Itf => 0x05,
            BarcodeType::Codabar => 0x06,
            BarcodeType::Code128 => 0x49,
        }
    }

    fn termination(self) -> Termination {
        match self {
            BarcodeType::UpcA
            | BarcodeType::UpcE
            | BarcodeType::Ean13
            | BarcodeType::Ean8
            | BarcodeType::Code39
            | BarcodeType::Itf
            | BarcodeType::Codabar => Termination::Nul,
            BarcodeType::Code128 => Termination::LengthPrefix,
        }
    }

    /// Whether the payload frame ends at the first NUL byte
    pub fn is_nul_terminated(self) -> bool {
        matches!(self.termination(), Termination::Nul)
    }

    /// Longest payload the frame can describe
    pub fn max_len(self) -> Option<usize> {
        match self.termination() {
            Termination::Nul => None,
            Termination::LengthPrefix => Some(MAX_CODE128_LEN),
        }
    }
}

/// 2D symbology (the `cn` byte of GS ( k)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TwoDSymbology {
    Pdf417 = 0x30,
    Qr = 0x31,
    Aztec = 0x35,
    DataMatrix = 0x36,
}

impl TwoDSymbology {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Only QR has a configurable error correction step
    pub fn has_ecc_step(self) -> bool {
        matches!(self, TwoDSymbology::Qr)
    }
}

const FN_MODULE_SIZE: u8 = 0x43;
const FN_ECC: u8 = 0x45;
const FN_STORE: u8 = 0x50;
const FN_PRINT: u8 = 0x51;

/// QR error correction level L
const ECC_LEVEL_L: u8 = 0x30;

// ============================================================================
// 1D
// ============================================================================

/// Module width 4, height 100 dots
pub fn barcode_dimensions() -> [u8; 6] {
    [GS, b'w', 0x04, GS, b'h', 0x64]
}

/// HRI font index 0
pub fn barcode_hri_font() -> [u8; 3] {
    [GS, b'f', 0x00]
}

/// The GS k payload frame
///
/// Caller guarantees `data.len() <= MAX_CODE128_LEN` for CODE128, and no
/// NUL bytes in `data` for the other types.
pub fn barcode_payload(data: &[u8], kind: BarcodeType) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(data.len() + 4);
    cmd.extend_from_slice(&[GS, b'k', kind.code()]);
    match kind.termination() {
        Termination::Nul => {
            cmd.extend_from_slice(data);
            cmd.push(0x00);
        }
        Termination::LengthPrefix => {
            cmd.push(data.len() as u8);
            cmd.extend_from_slice(data);
        }
    }
    cmd
}

/// All frames for a 1D barcode, in write order
pub fn barcode_frames(data: &[u8], kind: BarcodeType) -> Vec<Vec<u8>> {
    vec![
        barcode_dimensions().to_vec(),
        barcode_hri_font().to_vec(),
        barcode_payload(data, kind),
    ]
}

// ============================================================================
// 2D
// ============================================================================

/// Clamp a module size to 2..=16, falling back to 3
pub fn clamp_module_size(size: u8) -> u8 {
    if (2..=16).contains(&size) {
        size
    } else {
        DEFAULT_MODULE_SIZE
    }
}

/// Build one GS ( k envelope around `fn_code` and its parameters
///
/// Caller guarantees `params.len() + 2 <= u16::MAX`.
pub fn envelope(symbology: TwoDSymbology, fn_code: u8, params: &[u8]) -> Vec<u8> {
    let (pl, ph) = split_len((params.len() + 2) as u16);
    let mut cmd = Vec::with_capacity(params.len() + 7);
    cmd.extend_from_slice(&[GS, b'(', b'k', pl, ph, symbology.code(), fn_code]);
    cmd.extend_from_slice(params);
    cmd
}

pub fn module_size(symbology: TwoDSymbology, size: u8) -> Vec<u8> {
    envelope(symbology, FN_MODULE_SIZE, &[clamp_module_size(size)])
}

/// QR error correction, fixed at level L
pub fn qr_error_correction() -> Vec<u8> {
    envelope(TwoDSymbology::Qr, FN_ECC, &[ECC_LEVEL_L])
}

/// Store symbol data; the length field is `data.len() + 3`
///
/// Caller guarantees `data.len() <= MAX_2D_DATA_LEN`.
pub fn store_data(symbology: TwoDSymbology, data: &[u8]) -> Vec<u8> {
    let mut params = Vec::with_capacity(data.len() + 1);
    params.push(0x30);
    params.extend_from_slice(data);
    envelope(symbology, FN_STORE, &params)
}

pub fn print_symbol(symbology: TwoDSymbology) -> Vec<u8> {
    envelope(symbology, FN_PRINT, &[0x30])
}

/// All sub-frames for a 2D symbol, in write order
pub fn two_d_frames(symbology: TwoDSymbology, data: &[u8], size: u8) -> Vec<Vec<u8>> {
    let mut frames = Vec::with_capacity(4);
    frames.push(module_size(symbology, size));
    if symbology.has_ecc_step() {
        frames.push(qr_error_correction());
    }
    frames.push(store_data(symbology, data));
    frames.push(print_symbol(symbology));
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code128_payload() {
        let frame = barcode_payload(b"12345678", BarcodeType::Code128);
        assert_eq!(&frame[..4], &[0x1D, 0x6B, 0x49, 0x08]);
        assert_eq!(&frame[4..], b"12345678");
    }

    #[test]
    fn test_ean8_payload() {
        let frame = barcode_payload(b"12345678", BarcodeType::Ean8);
        assert_eq!(
            frame,
            vec![0x1D, 0x6B, 0x03, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x00]
        );
    }

    #[test]
    fn test_nul_terminated_types() {
        for kind in [
            BarcodeType::UpcA,
            BarcodeType::UpcE,
            BarcodeType::Ean13,
            BarcodeType::Ean8,
            BarcodeType::Code39,
            BarcodeType::Itf,
            BarcodeType::Codabar,
        ] {
            let frame = barcode_payload(b"0123", kind);
            assert_eq!(frame.last(), Some(&0x00));
            assert_eq!(frame.len(), 3 + 4 + 1);
            assert_eq!(kind.max_len(), None);
            assert!(kind.is_nul_terminated());
        }
        assert_eq!(BarcodeType::Code128.max_len(), Some(255));
        assert!(!BarcodeType::Code128.is_nul_terminated());
    }

    #[test]
    fn test_barcode_frames() {
        let frames = barcode_frames(b"ABC", BarcodeType::Code39);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], vec![0x1D, 0x77, 0x04, 0x1D, 0x68, 0x64]);
        assert_eq!(frames[1], vec![0x1D, 0x66, 0x00]);
    }

    #[test]
    fn test_clamp_module_size() {
        assert_eq!(clamp_module_size(0), 3);
        assert_eq!(clamp_module_size(1), 3);
        assert_eq!(clamp_module_size(2), 2);
        assert_eq!(clamp_module_size(16), 16);
        assert_eq!(clamp_module_size(17), 3);
        assert_eq!(
            module_size(TwoDSymbology::Qr, 1),
            module_size(TwoDSymbology::Qr, 3)
        );
    }

    #[test]
    fn test_qr_frames() {
        let frames = two_d_frames(TwoDSymbology::Qr, b"AB", 3);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 0x03]);
        assert_eq!(frames[1], vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x30]);
        assert_eq!(
            frames[2],
            vec![0x1D, 0x28, 0x6B, 0x05, 0x00, 0x31, 0x50, 0x30, b'A', b'B']
        );
        assert_eq!(frames[3], vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);
    }

    #[test]
    fn test_no_ecc_outside_qr() {
        for sym in [
            TwoDSymbology::Pdf417,
            TwoDSymbology::Aztec,
            TwoDSymbology::DataMatrix,
        ] {
            let frames = two_d_frames(sym, b"data", 5);
            assert_eq!(frames.len(), 3);
            assert!(frames.iter().all(|f| f[6] != 0x45));
            assert!(frames.iter().all(|f| f[5] == sym.code()));
        }
    }

    #[test]
    fn test_store_length_split() {
        let data = vec![b'x'; 300];
        let frame = store_data(TwoDSymbology::Pdf417, &data);
        // 303 = 1 * 256 + 47
        assert_eq!(&frame[3..5], &[47, 1]);
        assert_eq!(frame.len(), 8 + 300);
    }
}
