//! # crab-escpos
//!
//! ESC/POS command encoder for thermal printers.
//!
//! ## Scope
//!
//! This crate handles the protocol layer:
//! - ESC/POS command frames (text style, paper control, status query)
//! - 1D barcodes and 2D symbols (QR, PDF417, Aztec, DataMatrix)
//! - Text conversion to the printer code page (ISO-8859-15 or GBK)
//! - Blocking transports (TCP port 9100, device files, serial)
//!
//! Discovery, spooling and raster images stay in application code.
//!
//! ## Example
//!
//! ```ignore
//! use crab_escpos::{Alignment, BarcodeType, EscPosPrinter, PrinterConfig};
//!
//! let config = PrinterConfig::from_env();
//! let mut printer = EscPosPrinter::connect_tcp("192.168.1.100", 9100, &config)?;
//!
//! printer.init()?;
//! printer.align(Alignment::Center)?;
//! printer.size(2, 2)?;
//! printer.print_line("Mesa 12")?;
//! printer.size(1, 1)?;
//! printer.barcode("12345678", BarcodeType::Ean8)?;
//! printer.qr("https://example.com", 6)?;
//! printer.feed(3)?;
//! printer.cut()?;
//! printer.end()?;
//!
//! let status = printer.error_status()?;
//! printer.close()?;
//! ```

pub mod barcode;
pub mod command;
mod config;
mod encoding;
mod error;
mod printer;
mod status;
pub mod transport;

// Re-exports
pub use barcode::{BarcodeType, TwoDSymbology};
pub use command::{Alignment, Font};
pub use config::PrinterConfig;
pub use encoding::{
    CharacterConverter, CodePage, Converter, Encoded, GbkConverter, Latin9Converter, substitute,
};
pub use error::{EncodingError, PrintError, PrintResult};
pub use printer::{DEFAULT_PORT, EscPosPrinter};
pub use status::ErrorStatus;
pub use transport::{Connection, Stream};
