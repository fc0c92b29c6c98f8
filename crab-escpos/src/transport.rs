//! Byte-stream transports
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Device files (e.g. `/dev/usb/lp0`)
//! - Serial ports (feature `serial`)
//! - Any `Read + Write` stream via [`Stream`]
//!
//! All I/O is blocking. Nothing here retries.

use std::fs::File;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use tracing::{debug, warn};

/// A bidirectional byte stream to a printer
pub trait Connection {
    /// Write all of `data`
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Fill `buf` completely, blocking until it is
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Apply a write deadline
    ///
    /// Returns `Ok(false)` if the connection has no deadline capability.
    fn set_write_timeout(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(false)
    }

    /// Release the underlying stream
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Connection for TcpStream {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data)?;
        self.flush()
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_exact(buf)
    }

    fn set_write_timeout(&mut self, timeout: Duration) -> io::Result<bool> {
        TcpStream::set_write_timeout(self, Some(timeout))?;
        Ok(true)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

impl Connection for File {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data)?;
        self.flush()
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_exact(buf)
    }
}

#[cfg(feature = "serial")]
impl Connection for Box<dyn serialport::SerialPort> {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data)?;
        self.flush()
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_exact(buf)
    }

    fn set_write_timeout(&mut self, timeout: Duration) -> io::Result<bool> {
        self.set_timeout(timeout)?;
        Ok(true)
    }
}

/// Wraps any `Read + Write` stream that has no deadline support
#[derive(Debug)]
pub struct Stream<T>(pub T);

impl<T: Read + Write> Connection for Stream<T> {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.0.write_all(data)?;
        self.0.flush()
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.0.read_exact(buf)
    }
}

/// Frame-level adapter over a [`Connection`]
///
/// Applies the configured write deadline before every write, when the
/// connection supports one.
#[derive(Debug)]
pub struct Transport<C> {
    conn: C,
    write_timeout: Option<Duration>,
}

impl<C: Connection> Transport<C> {
    pub fn new(conn: C, write_timeout: Option<Duration>) -> Self {
        Self {
            conn,
            write_timeout,
        }
    }

    /// Write one frame
    pub fn write(&mut self, frame: &[u8]) -> io::Result<()> {
        if let Some(timeout) = self.write_timeout {
            match self.conn.set_write_timeout(timeout) {
                // Ok(false): no deadline capability, skip silently
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Failed to set write deadline"),
            }
        }
        self.conn.send(frame)?;
        debug!(len = frame.len(), "Frame written");
        Ok(())
    }

    /// Read exactly `buf.len()` bytes
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.conn.receive(buf)?;
        debug!(len = buf.len(), "Response read");
        Ok(())
    }

    pub fn close(&mut self) -> io::Result<()> {
        self.conn.close()
    }

    pub fn get_ref(&self) -> &C {
        &self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Default)]
    struct DeadlineConn {
        written: Vec<u8>,
        deadlines: Vec<Duration>,
        fail_deadline: bool,
    }

    impl Connection for DeadlineConn {
        fn send(&mut self, data: &[u8]) -> io::Result<()> {
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn receive(&mut self, _buf: &mut [u8]) -> io::Result<()> {
            Err(io::ErrorKind::UnexpectedEof.into())
        }

        fn set_write_timeout(&mut self, timeout: Duration) -> io::Result<bool> {
            if self.fail_deadline {
                return Err(io::Error::other("no deadline today"));
            }
            self.deadlines.push(timeout);
            Ok(true)
        }
    }

    #[test]
    fn test_deadline_applied_per_write() {
        let mut t = Transport::new(DeadlineConn::default(), Some(Duration::from_secs(10)));
        t.write(&[1, 2]).unwrap();
        t.write(&[3]).unwrap();
        let conn = t.into_inner();
        assert_eq!(conn.written, vec![1, 2, 3]);
        assert_eq!(conn.deadlines, vec![Duration::from_secs(10); 2]);
    }

    #[test]
    fn test_no_deadline_configured() {
        let mut t = Transport::new(DeadlineConn::default(), None);
        t.write(&[1]).unwrap();
        assert!(t.get_ref().deadlines.is_empty());
    }

    #[test]
    fn test_deadline_failure_still_writes() {
        let conn = DeadlineConn {
            fail_deadline: true,
            ..Default::default()
        };
        let mut t = Transport::new(conn, Some(Duration::from_secs(1)));
        t.write(&[9]).unwrap();
        assert_eq!(t.get_ref().written, vec![9]);
    }

    #[test]
    fn test_stream_without_deadline() {
        let mut t = Transport::new(Stream(Cursor::new(vec![0x12u8])), Some(Duration::from_secs(1)));
        let mut buf = [0u8; 1];
        t.read(&mut buf).unwrap();
        assert_eq!(buf, [0x12]);
        t.write(&[0xAA]).unwrap();
        // the cursor advanced past the byte we read
        assert_eq!(t.into_inner().0.into_inner(), vec![0x12, 0xAA]);
    }

    #[test]
    fn test_read_failure() {
        let mut t = Transport::new(DeadlineConn::default(), None);
        let mut buf = [0u8; 1];
        let err = t.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
