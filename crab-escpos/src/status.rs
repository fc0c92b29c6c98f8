//! Printer status byte

use std::fmt;

/// Raw status byte returned by `DLE EOT 2`
///
/// The value is transported as-is; the accessors below follow the common
/// offline-cause layout but firmware may differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorStatus(pub u8);

impl ErrorStatus {
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Bit 2
    pub fn cover_open(self) -> bool {
        self.0 & 0x04 != 0
    }

    /// Bit 3
    pub fn feed_button_pressed(self) -> bool {
        self.0 & 0x08 != 0
    }

    /// Bit 5
    pub fn paper_end_stop(self) -> bool {
        self.0 & 0x20 != 0
    }

    /// Bit 6
    pub fn error(self) -> bool {
        self.0 & 0x40 != 0
    }
}

impl From<u8> for ErrorStatus {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
