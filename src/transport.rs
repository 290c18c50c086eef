//! The byte pipe packets travel over.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use log::debug;

use crate::config::ClientConfig;

/// A connection to a TACACS+ server.
///
/// Implementations only move bytes; they never retry, and a short read is handed
/// back as-is for the packet parser to reject.
pub trait Transport {
    /// Writes an entire packet to the server.
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Performs a single blocking read of at most `max_bytes`.
    fn receive(&mut self, max_bytes: usize) -> io::Result<Vec<u8>>;
}

/// A blocking TCP connection with timeouts taken from a [`ClientConfig`].
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connects to the configured server, trying each resolved address in turn.
    pub fn connect(config: &ClientConfig) -> io::Result<Self> {
        let timeout = config.timeout();
        let mut last_error = None;

        for address in (config.server().as_str(), config.port()).to_socket_addrs()? {
            debug!(target: "tacacs_plus_auth", "connecting to {address}");

            match TcpStream::connect_timeout(&address, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout))?;
                    stream.set_write_timeout(Some(timeout))?;
                    return Ok(Self { stream });
                }
                Err(error) => last_error = Some(error),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} did not resolve to any address", config.server()),
            )
        }))
    }

    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    fn receive(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
        let mut buffer = vec![0; max_bytes];
        let read = self.stream.read(&mut buffer)?;
        buffer.truncate(read);
        Ok(buffer)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).send(bytes)
    }

    fn receive(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
        (**self).receive(max_bytes)
    }
}
