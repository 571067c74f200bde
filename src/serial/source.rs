use std::io::{self, Read};
use log::{error, info, warn};
use serialport::SerialPort;

use crate::config::SerialConfig;
use super::framer::LineFramer;

/// A line oriented record source polled by the driver
pub trait LineSource {
    /// Next complete record, or `None` when nothing is buffered yet.
    /// Must not block longer than the source's read timeout.
    fn try_read_line(&mut self) -> Option<String>;

    fn is_available(&self) -> bool {
        true
    }
}

/// The part of a serial port the line source needs
pub trait PortIo: Read {
    /// Bytes the driver has buffered and a read can return right away
    fn bytes_to_read(&self) -> io::Result<u32>;
}

impl PortIo for Box<dyn SerialPort> {
    fn bytes_to_read(&self) -> io::Result<u32> {
        SerialPort::bytes_to_read(&**self).map_err(io::Error::from)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
}

/// Reads newline delimited records from a serial port
pub struct SerialLineSource<P: PortIo = Box<dyn SerialPort>> {
    port: P,
    framer: LineFramer,
    read_buf: Vec<u8>,
    failed: bool,
}

impl SerialLineSource {
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(config.timeout())
            .open()
            .map_err(|source| TransportError::Open {
                port: config.port.clone(),
                source,
            })?;

        info!("Opened serial port {} at {} baud", config.port, config.baud_rate);

        Ok(Self::with_port(port, config.max_line_length))
    }
}

impl<P: PortIo> SerialLineSource<P> {
    pub fn with_port(port: P, max_line_length: usize) -> Self {
        Self {
            port,
            framer: LineFramer::new(max_line_length),
            read_buf: vec![0u8; max_line_length],
            failed: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let waiting = self.port.bytes_to_read()? as usize;
        if waiting == 0 {
            return Ok(());
        }

        let want = waiting.min(self.read_buf.len());
        match self.port.read(&mut self.read_buf[..want]) {
            Ok(n) => {
                self.framer.push(&self.read_buf[..n]);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl<P: PortIo> LineSource for SerialLineSource<P> {
    fn try_read_line(&mut self) -> Option<String> {
        if self.failed {
            return None;
        }

        // a line left over from an earlier read is served first
        if let Some(line) = self.framer.pop_line() {
            return Some(line);
        }

        if let Err(e) = self.fill() {
            error!("Serial read failed, ingestion disabled: {}", e);
            self.failed = true;
            return None;
        }

        self.framer.pop_line()
    }

    fn is_available(&self) -> bool {
        !self.failed
    }
}

/// The transport as seen by the poll driver.
///
/// When the port could not be opened at startup the panel keeps running
/// with `Unavailable`, which never yields a line.
pub enum Transport {
    Serial(SerialLineSource),
    Unavailable,
}

impl Transport {
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        SerialLineSource::open(config).map(Transport::Serial)
    }

    /// Opens the port, degrading to `Unavailable` on failure.
    /// The error is returned once so the caller can tell the operator.
    pub fn open_or_unavailable(config: &SerialConfig) -> (Self, Option<TransportError>) {
        match Self::open(config) {
            Ok(transport) => (transport, None),
            Err(e) => {
                warn!("{}; running without sensor input", e);
                (Transport::Unavailable, Some(e))
            }
        }
    }
}

impl LineSource for Transport {
    fn try_read_line(&mut self) -> Option<String> {
        match self {
            Transport::Serial(source) => source.try_read_line(),
            Transport::Unavailable => None,
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Transport::Serial(source) => source.is_available(),
            Transport::Unavailable => false,
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;
    use super::LineSource;

    /// Replays canned lines, one per call, then reports no data
    #[derive(Debug, Default)]
    pub struct ScriptedSource {
        lines: VecDeque<String>,
    }

    impl ScriptedSource {
        pub fn new<I, S>(lines: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                lines: lines.into_iter().map(Into::into).collect(),
            }
        }

        pub fn remaining(&self) -> usize {
            self.lines.len()
        }
    }

    impl LineSource for ScriptedSource {
        fn try_read_line(&mut self) -> Option<String> {
            self.lines.pop_front()
        }
    }
}
