//! TCP transport to an accepted glove connection

use super::Transport;
use crate::error::Result;
use crate::protocol::constants::MAX_REPLY_LEN;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

/// Blocking TCP stream to the glove
pub struct TcpTransport {
    stream: TcpStream,
    peer: SocketAddr,
}

impl TcpTransport {
    /// Wrap an accepted stream
    ///
    /// The stream is switched to blocking mode with no read timeout: once
    /// connected, reads wait for the glove as long as it takes.
    pub fn new(stream: TcpStream) -> Result<Self> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(None)?;
        if let Err(e) = stream.set_nodelay(true) {
            log::warn!("Failed to set TCP_NODELAY: {}", e);
        }
        let peer = stream.peer_addr()?;
        Ok(Self { stream, peer })
    }

    /// Address of the glove
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.stream.write_all(data)?;
        self.stream.flush()?;
        Ok(())
    }

    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize> {
        loop {
            match self.stream.read(buffer) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn discard_pending(&mut self) -> Result<usize> {
        self.stream.set_nonblocking(true)?;

        let mut scratch = [0u8; MAX_REPLY_LEN];
        let mut discarded = 0;
        let outcome = loop {
            match self.stream.read(&mut scratch) {
                // Peer closed; the next blocking read reports it
                Ok(0) => break Ok(()),
                Ok(n) => discarded += n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => break Err(e),
            }
        };

        self.stream.set_nonblocking(false)?;
        outcome?;
        Ok(discarded)
    }

    fn shutdown(&mut self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
