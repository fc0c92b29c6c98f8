//! Printer facade
//!
//! [`EscPosPrinter`] owns one connection and turns high-level calls into
//! ESC/POS frames. Each frame is one blocking write; a failed write aborts
//! the rest of the call.
//!
//! The printer is not `Sync`-safe by contract: every method takes
//! `&mut self`, and sharing one across threads needs an external `Mutex`.

use std::fs::{File, OpenOptions};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use tracing::{info, instrument};

use crate::barcode::{self, BarcodeType, MAX_2D_DATA_LEN, TwoDSymbology};
use crate::command::{self, Alignment, Font};
use crate::config::PrinterConfig;
use crate::encoding::{CharacterConverter, Converter, substitute};
use crate::error::{PrintError, PrintResult};
use crate::status::ErrorStatus;
use crate::transport::{Connection, Transport};

/// Default raw printing port, for [`EscPosPrinter::connect_tcp`]
pub const DEFAULT_PORT: u16 = 9100;

/// ESC/POS printer over a single connection
///
/// Once [`close`](Self::close) has been called every operation fails with
/// [`PrintError::Closed`].
pub struct EscPosPrinter<C, E = Converter> {
    transport: Option<Transport<C>>,
    converter: E,
}

impl<C: Connection> EscPosPrinter<C> {
    /// Wrap an open connection, taking code page and deadline from `config`
    pub fn new(conn: C, config: &PrinterConfig) -> Self {
        Self::with_converter(conn, config.code_page.converter(), config.write_timeout())
    }
}

impl<C: Connection, E: CharacterConverter> EscPosPrinter<C, E> {
    /// Wrap an open connection with a custom converter
    pub fn with_converter(conn: C, converter: E, write_timeout: Option<Duration>) -> Self {
        Self {
            transport: Some(Transport::new(conn, write_timeout)),
            converter,
        }
    }

    /// The underlying connection, if still open
    pub fn connection(&self) -> Option<&C> {
        self.transport.as_ref().map(Transport::get_ref)
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    fn transport(&mut self) -> PrintResult<&mut Transport<C>> {
        self.transport.as_mut().ok_or(PrintError::Closed)
    }

    fn write(&mut self, frame: &[u8]) -> PrintResult<()> {
        self.transport()?.write(frame)?;
        Ok(())
    }

    fn write_all_frames(&mut self, frames: &[Vec<u8>]) -> PrintResult<()> {
        for frame in frames {
            self.write(frame)?;
        }
        Ok(())
    }

    /// Close the connection; further calls fail
    #[instrument(skip(self))]
    pub fn close(&mut self) -> PrintResult<()> {
        let mut transport = self.transport.take().ok_or(PrintError::Closed)?;
        transport.close()?;
        info!("Printer connection closed");
        Ok(())
    }

    // === Job Control ===

    /// Reset the printer and select the default code table
    ///
    /// All toggled modes return to device defaults.
    pub fn init(&mut self) -> PrintResult<()> {
        self.write(&command::init())
    }

    /// Reset the printer, keeping its current code table
    ///
    /// Use this instead of [`init`](Self::init) on GBK printers.
    pub fn reset(&mut self) -> PrintResult<()> {
        self.write(&command::reset())
    }

    /// Finalize the print job (does not close the connection)
    pub fn end(&mut self) -> PrintResult<()> {
        self.write(&command::end())
    }

    pub fn cut(&mut self) -> PrintResult<()> {
        self.write(&command::cut())
    }

    pub fn feed(&mut self, lines: u8) -> PrintResult<()> {
        self.write(&command::feed(lines))
    }

    /// Write caller-built bytes verbatim
    pub fn write_raw(&mut self, data: &[u8]) -> PrintResult<()> {
        self.transport()?;
        if data.is_empty() {
            return Ok(());
        }
        self.write(data)
    }

    // === Text ===

    /// Print text in the configured code page
    ///
    /// Empty text writes nothing. Nothing is written if conversion fails.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub fn print(&mut self, text: &str) -> PrintResult<()> {
        self.transport()?;
        if text.is_empty() {
            return Ok(());
        }
        let bytes = self.encode_text(text)?;
        self.write(&bytes)
    }

    /// Convert to the code page, then apply the substitution pass
    fn encode_text(&self, text: &str) -> PrintResult<Vec<u8>> {
        let encoded = self.converter.encode(text)?;
        Ok(substitute(encoded.bytes))
    }

    /// Print text followed by a newline
    pub fn print_line(&mut self, text: &str) -> PrintResult<()> {
        self.print(text)?;
        self.line_feed()
    }

    pub fn line_feed(&mut self) -> PrintResult<()> {
        self.write(&command::line_feed())
    }

    // === Text Style ===

    /// Character size, `width` and `height` in 1..=16
    pub fn size(&mut self, width: u8, height: u8) -> PrintResult<()> {
        self.write(&command::size(width, height))
    }

    pub fn font(&mut self, font: Font) -> PrintResult<()> {
        self.write(&command::font(font))
    }

    pub fn underline(&mut self, enabled: bool) -> PrintResult<()> {
        self.write(&command::underline(enabled))
    }

    pub fn kanji_underline(&mut self, enabled: bool) -> PrintResult<()> {
        self.write(&command::kanji_underline(enabled))
    }

    pub fn smooth(&mut self, enabled: bool) -> PrintResult<()> {
        self.write(&command::smooth(enabled))
    }

    pub fn bold(&mut self, enabled: bool) -> PrintResult<()> {
        self.write(&command::bold(enabled))
    }

    /// Shares one register with [`double_width`](Self::double_width);
    /// the last call wins. Use [`kanji_print_mode`](Self::kanji_print_mode)
    /// for both at once.
    pub fn double_height(&mut self, enabled: bool) -> PrintResult<()> {
        self.write(&command::double_height(enabled))
    }

    /// See [`double_height`](Self::double_height)
    pub fn double_width(&mut self, enabled: bool) -> PrintResult<()> {
        self.write(&command::double_width(enabled))
    }

    pub fn kanji_print_mode(&mut self, double_width: bool, double_height: bool) -> PrintResult<()> {
        self.write(&command::kanji_print_mode(double_width, double_height))
    }

    pub fn align(&mut self, alignment: Alignment) -> PrintResult<()> {
        self.write(&command::align(alignment))
    }

    /// Print area width in dots; the default is the full head width
    pub fn print_area_width(&mut self, width: u16) -> PrintResult<()> {
        self.write(&command::print_area_width(width))
    }

    /// Select an international character set by raw index
    pub fn character_set(&mut self, n: u8) -> PrintResult<()> {
        self.write(&command::character_set(n))
    }

    // === Barcodes ===

    /// Print a 1D barcode followed by its value as a text line
    #[instrument(skip(self, payload), fields(len = payload.len()))]
    pub fn barcode(&mut self, payload: &str, kind: BarcodeType) -> PrintResult<()> {
        self.transport()?;
        let data = payload.as_bytes();
        if let Some(max) = kind.max_len()
            && data.len() > max
        {
            return Err(PrintError::PayloadTooLong {
                len: data.len(),
                max,
            });
        }
        if kind.is_nul_terminated() && data.contains(&0x00) {
            return Err(PrintError::InvalidPayload(format!(
                "{:?} payload contains a NUL byte",
                kind
            )));
        }
        // Encode the text line up front so a conversion failure writes nothing
        let text = self.encode_text(payload)?;

        self.write_all_frames(&barcode::barcode_frames(data, kind))?;
        if !text.is_empty() {
            self.write(&text)?;
        }
        self.line_feed()
    }

    /// Print a 2D symbol
    ///
    /// `size` is the module size in 2..=16; anything else prints at 3.
    #[instrument(skip(self, payload), fields(len = payload.len()))]
    pub fn two_d(&mut self, payload: &str, size: u8, symbology: TwoDSymbology) -> PrintResult<()> {
        self.transport()?;
        let data = payload.as_bytes();
        if data.len() > MAX_2D_DATA_LEN {
            return Err(PrintError::PayloadTooLong {
                len: data.len(),
                max: MAX_2D_DATA_LEN,
            });
        }

        self.write_all_frames(&barcode::two_d_frames(symbology, data, size))
    }

    pub fn qr(&mut self, payload: &str, size: u8) -> PrintResult<()> {
        self.two_d(payload, size, TwoDSymbology::Qr)
    }

    pub fn pdf417(&mut self, payload: &str, size: u8) -> PrintResult<()> {
        self.two_d(payload, size, TwoDSymbology::Pdf417)
    }

    pub fn aztec(&mut self, payload: &str, size: u8) -> PrintResult<()> {
        self.two_d(payload, size, TwoDSymbology::Aztec)
    }

    pub fn data_matrix(&mut self, payload: &str, size: u8) -> PrintResult<()> {
        self.two_d(payload, size, TwoDSymbology::DataMatrix)
    }

    // === Status ===

    /// Query the offline-cause status byte
    ///
    /// One write, then one blocking 1-byte read. Do not issue another query
    /// before this one returns.
    #[instrument(skip(self))]
    pub fn error_status(&mut self) -> PrintResult<ErrorStatus> {
        let transport = self.transport()?;
        transport.write(&command::status_query())?;

        let mut buf = [0u8; 1];
        transport.read(&mut buf)?;
        Ok(ErrorStatus(buf[0]))
    }
}

impl EscPosPrinter<TcpStream> {
    /// Connect to a network printer
    #[instrument(skip(config))]
    pub fn connect_tcp(host: &str, port: u16, config: &PrinterConfig) -> PrintResult<Self> {
        let addr: SocketAddr = (host, port)
            .to_socket_addrs()
            .map_err(|e| PrintError::InvalidConfig(format!("Invalid address {}:{}: {}", host, port, e)))?
            .next()
            .ok_or_else(|| PrintError::InvalidConfig(format!("No address for {}:{}", host, port)))?;

        let stream = TcpStream::connect_timeout(&addr, config.connect_timeout())
            .map_err(|e| PrintError::Connection(format!("{}: {}", addr, e)))?;
        stream.set_nodelay(true)?;

        info!(%addr, "Connected to printer");
        Ok(Self::new(stream, config))
    }
}

impl EscPosPrinter<File> {
    /// Open a printer device file, e.g. `/dev/usb/lp0`
    #[instrument(skip(path, config), fields(path = %path.as_ref().display()))]
    pub fn open_device(path: impl AsRef<Path>, config: &PrinterConfig) -> PrintResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| PrintError::Connection(format!("{}: {}", path.display(), e)))?;

        info!("Opened printer device");
        Ok(Self::new(file, config))
    }
}

#[cfg(feature = "serial")]
impl EscPosPrinter<Box<dyn serialport::SerialPort>> {
    /// Open a serial printer
    #[instrument(skip(config))]
    pub fn open_serial(path: &str, baud: u32, config: &PrinterConfig) -> PrintResult<Self> {
        let mut builder = serialport::new(path, baud);
        if let Some(timeout) = config.write_timeout() {
            builder = builder.timeout(timeout);
        }
        let port = builder
            .open()
            .map_err(|e| PrintError::Connection(format!("{}: {}", path, e)))?;

        info!("Opened serial printer");
        Ok(Self::new(port, config))
    }
}
