//! ESC/POS command frames
//!
//! Pure byte assembly for stateless printer directives. Nothing here does
//! I/O or fails; parameters are assumed valid per each function's contract.

pub const ESC: u8 = 0x1B;
pub const GS: u8 = 0x1D;
pub const FS: u8 = 0x1C;
pub const DLE: u8 = 0x10;
pub const EOT: u8 = 0x04;
pub const LF: u8 = 0x0A;

/// Code table selected by `init` (ISO-8859-15)
pub const DEFAULT_CODE_TABLE: u8 = 40;

/// Font face (ESC M n)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Font {
    #[default]
    A = 0,
    B = 1,
    C = 2,
}

/// Justification (ESC a n)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// Reset the printer (ESC @)
///
/// Clears bold, underline and size modes back to device defaults without
/// touching the code table, for printers set up for double-byte text.
pub fn reset() -> [u8; 2] {
    [ESC, b'@']
}

/// Reset the printer and select the default code table
pub fn init() -> Vec<u8> {
    let mut buf = reset().to_vec();
    buf.extend_from_slice(&code_table(DEFAULT_CODE_TABLE));
    buf
}

/// End-of-job marker
pub fn end() -> [u8; 1] {
    [0xFA]
}

/// Full cut (GS V 65 48)
pub fn cut() -> [u8; 4] {
    [GS, b'V', b'A', b'0']
}

/// Print and feed `lines` lines
pub fn feed(lines: u8) -> [u8; 3] {
    [ESC, b'd', lines]
}

/// Pack a character size into the GS ! parameter byte
///
/// `width` and `height` are magnification factors in 1..=16. Outside that
/// range the result is meaningless (but never panics).
pub fn pack_size(width: u8, height: u8) -> u8 {
    (width.wrapping_sub(1) << 4) | (height.wrapping_sub(1) & 0x0F)
}

/// Select character size
pub fn size(width: u8, height: u8) -> [u8; 3] {
    [GS, b'!', pack_size(width, height)]
}

pub fn font(font: Font) -> [u8; 3] {
    [ESC, b'M', font as u8]
}

pub fn underline(enabled: bool) -> [u8; 3] {
    [ESC, b'-', enabled as u8]
}

/// Underline for double-byte characters (FS -)
pub fn kanji_underline(enabled: bool) -> [u8; 3] {
    [FS, b'-', enabled as u8]
}

/// Smoothing (GS b)
pub fn smooth(enabled: bool) -> [u8; 3] {
    [GS, b'b', enabled as u8]
}

pub fn bold(enabled: bool) -> [u8; 3] {
    [ESC, b'E', enabled as u8]
}

/// Double-byte print mode register (FS !)
///
/// Bit 2 is double width, bit 3 double height.
pub fn kanji_print_mode(double_width: bool, double_height: bool) -> [u8; 3] {
    let mut n = 0u8;
    if double_width {
        n |= 0x04;
    }
    if double_height {
        n |= 0x08;
    }
    [FS, b'!', n]
}

/// Double height via FS !
///
/// Writes the whole register: disabling also clears double width.
pub fn double_height(enabled: bool) -> [u8; 3] {
    kanji_print_mode(false, enabled)
}

/// Double width via FS !
///
/// Writes the whole register: disabling also clears double height.
pub fn double_width(enabled: bool) -> [u8; 3] {
    kanji_print_mode(enabled, false)
}

pub fn align(alignment: Alignment) -> [u8; 3] {
    [ESC, b'a', alignment as u8]
}

/// Split a length into (low, high) bytes, base 256
pub fn split_len(len: u16) -> (u8, u8) {
    ((len % 256) as u8, (len / 256) as u8)
}

/// Set print area width in dots (GS W nL nH)
///
/// 380 suits the narrower receipts used by card terminals.
pub fn print_area_width(width: u16) -> [u8; 4] {
    let (nl, nh) = split_len(width);
    [GS, b'W', nl, nh]
}

/// Select international character set (ESC R n)
///
/// `n` is a raw, firmware-specific table index (15 = China on most models).
pub fn character_set(n: u8) -> [u8; 3] {
    [ESC, b'R', n]
}

/// Select character code table (ESC t n)
pub fn code_table(n: u8) -> [u8; 3] {
    [ESC, b't', n]
}

pub fn line_feed() -> [u8; 1] {
    [LF]
}

/// Real-time status request, offline cause (DLE EOT 2)
pub fn status_query() -> [u8; 3] {
    [DLE, EOT, 0x02]
}
