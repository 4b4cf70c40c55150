//! Listening side of the connection
//!
//! The glove is the TCP client: it is configured (via its flash card) with the
//! host's static IP address and port, and dials in after power-up. The host
//! therefore has to own that address and listen for exactly one connection.

use crate::error::{Error, Result};
use crate::protocol::constants::{HANDSHAKE_BYTE, MAX_REPLY_LEN};
use crate::transport::Transport;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, ErrorKind};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Parse the host address given by the user or the configuration
pub fn parse_ipv4(text: &str) -> Result<Ipv4Addr> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidAddress(text.to_string()))
}

/// Check whether `address` is assigned to one of this host's interfaces
pub fn is_local_address(address: Ipv4Addr) -> Result<bool> {
    let interfaces = local_ip_address::list_afinet_netifas()
        .map_err(|e| Error::Io(io::Error::other(format!("Failed to list interfaces: {}", e))))?;

    for (name, ip) in &interfaces {
        if *ip == IpAddr::V4(address) {
            log::debug!("Address {} found on interface {}", address, name);
            return Ok(true);
        }
    }
    Ok(false)
}

/// Bound listening socket waiting for the glove
pub struct GloveListener {
    listener: TcpListener,
    poll_interval: Duration,
}

impl GloveListener {
    /// Verify `address` is local, then listen on `port` on all interfaces
    ///
    /// No socket is created when the address check fails. Port 0 picks an
    /// ephemeral port, see [`GloveListener::local_port`].
    pub fn bind(address: Ipv4Addr, port: u16, poll_interval: Duration) -> Result<Self> {
        if !is_local_address(address)? {
            log::error!(
                "Glove cannot connect: {} is not an address of this host, check the network connection",
                address
            );
            return Err(Error::AddressNotLocal(address));
        }

        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        socket.bind(&bind_addr.into())?;
        // Single glove, single pending connection
        socket.listen(1)?;

        let listener: TcpListener = socket.into();
        listener.set_nonblocking(true)?;

        log::info!("Waiting for glove connection on port {}", port);
        Ok(Self {
            listener,
            poll_interval,
        })
    }

    /// Port actually bound
    pub fn local_port(&self) -> Result<u16> {
        Ok(self.listener.local_addr()?.port())
    }

    /// Wait for the glove, checking `cancel` between polls
    ///
    /// The listening socket is closed when this returns, whatever the outcome.
    pub fn accept(self, cancel: &AtomicBool) -> Result<(TcpStream, SocketAddr)> {
        loop {
            if cancel.load(Ordering::Relaxed) {
                log::info!("Waiting for glove cancelled");
                return Err(Error::Cancelled);
            }

            match self.listener.accept() {
                Ok((stream, addr)) => {
                    log::info!("Glove connected from {}", addr);
                    return Ok((stream, addr));
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(self.poll_interval);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    log::error!("Accept error: {}", e);
                    return Err(e.into());
                }
            }
        }
    }
}

/// Read the glove's first message and require it to be `o`
///
/// On mismatch the transport is shut down before returning.
pub fn verify_handshake(transport: &mut dyn Transport) -> Result<()> {
    let mut buffer = [0u8; MAX_REPLY_LEN];
    let n = transport.recv(&mut buffer)?;
    let received = &buffer[..n];

    if received != [HANDSHAKE_BYTE].as_slice() {
        log::error!(
            "Glove did not acknowledge the connection (got {:02X?}), try restarting the glove",
            received
        );
        if let Err(e) = transport.shutdown() {
            log::warn!("Failed to close rejected connection: {}", e);
        }
        return Err(Error::HandshakeFailed {
            received: received.to_vec(),
        });
    }

    log::debug!("Handshake acknowledged");
    Ok(())
}
