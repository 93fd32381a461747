//! Client-side connection
//!
//! One dialed TCP stream issuing framed calls.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{Result, RushError};
use crate::protocol::{read_response, write_command, Command, Payload};

/// A single client connection to a rushkv server
pub struct ClientConnection {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    peer_addr: String,
}

impl ClientConnection {
    /// Dial `addr`
    ///
    /// `dial_timeout` bounds connection setup; `call_timeout` bounds every
    /// read and write afterwards.
    pub fn dial(
        addr: &str,
        dial_timeout: Option<Duration>,
        call_timeout: Option<Duration>,
    ) -> Result<Self> {
        let stream = match dial_timeout {
            Some(timeout) => connect_timeout(addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };

        stream.set_nodelay(true)?;
        stream.set_read_timeout(call_timeout)?;
        stream.set_write_timeout(call_timeout)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr: addr.to_string(),
        })
    }

    /// Send one command and wait for its response
    pub fn round_trip(&mut self, command: &Command) -> Result<Payload> {
        write_command(&mut self.writer, command)?;
        let response = read_response(&mut self.reader)?;
        response.into_payload()
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Try every resolved address in turn
fn connect_timeout(addr: &str, timeout: Duration) -> Result<TcpStream> {
    let mut last_err = None;
    for sock_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&sock_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(match last_err {
        Some(e) => RushError::Io(e),
        None => RushError::Network(format!("{} resolved to no addresses", addr)),
    })
}

/// Whether a dial failure is the expected "nobody listening yet" case
pub fn is_quiet_dial_error(err: &RushError) -> bool {
    match err {
        RushError::Io(e) => matches!(e.kind(), ErrorKind::ConnectionRefused | ErrorKind::NotFound),
        _ => false,
    }
}

/// Log a dial failure at the level it deserves
pub(crate) fn log_dial_error(addr: &str, err: &RushError) {
    if is_quiet_dial_error(err) {
        tracing::trace!("Dial {} failed: {}", addr, err);
    } else {
        tracing::warn!("Dial {} failed: {}", addr, err);
    }
}
