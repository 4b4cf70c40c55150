//! Connection to the glove
//!
//! [`DeviceLink`] owns the single connection to a CyberGlove III and runs the
//! request/response exchanges on it.
//!
//! # Connection Lifecycle
//!
//! ```text
//! ┌──────────────┐ connect  ┌───────────┐ accept + 'o' ┌───────────┐
//! │ Disconnected │ ───────▶ │ Listening │ ───────────▶ │ Connected │
//! └──────────────┘          └───────────┘              └───────────┘
//!        ▲   cancelled / bad handshake │                     │
//!        └─────────────────────────────┴─────────────────────┘
//!                      disconnect / peer closed / I/O fault
//! ```
//!
//! # Synchronization
//!
//! The protocol is strictly request-then-response on one stream. Every
//! exchange holds the connection mutex for its whole round trip, so a query
//! issued while a sampling thread is running waits for the in-flight dataset
//! instead of interleaving with it. `DeviceLink` is a cheap handle; clones
//! share the connection.

mod listener;
pub mod query;

pub use listener::{is_local_address, parse_ipv4, verify_handshake, GloveListener};
pub use query::{GloveStatus, GloveVersion};

use crate::config::LinkConfig;
use crate::error::{Error, Result};
use crate::protocol::constants::{DATASET_FRAME_LEN, MAX_REPLY_LEN};
use crate::protocol::{decode_dataset, encode, Command, Dataset};
use crate::transport::{TcpTransport, Transport};
use parking_lot::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Listening,
    Connected,
}

/// Handle to the glove connection
#[derive(Clone)]
pub struct DeviceLink {
    inner: Arc<LinkInner>,
}

struct LinkInner {
    config: LinkConfig,
    /// The connection; held for the full duration of each exchange
    connection: Mutex<Option<Box<dyn Transport>>>,
    /// Kept apart from `connection` so it can be read during a blocking exchange
    state: Mutex<LinkState>,
}

impl DeviceLink {
    /// Create a disconnected link
    pub fn new(config: LinkConfig) -> Self {
        Self {
            inner: Arc::new(LinkInner {
                config,
                connection: Mutex::new(None),
                state: Mutex::new(LinkState::Disconnected),
            }),
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.inner.config
    }

    pub fn state(&self) -> LinkState {
        *self.inner.state.lock()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == LinkState::Connected
    }

    fn set_state(&self, state: LinkState) {
        *self.inner.state.lock() = state;
    }

    /// Wait for the glove to connect to `local_address` on the configured port
    ///
    /// Blocks until the glove connects and acknowledges, or until `cancel` is
    /// set (checked every `accept_poll_interval_ms`).
    ///
    /// # Errors
    /// - [`Error::InvalidAddress`] / [`Error::AddressNotLocal`] before any socket is opened
    /// - [`Error::Cancelled`] when `cancel` was set while waiting
    /// - [`Error::HandshakeFailed`] when the glove's first message is not `o`
    pub fn connect(&self, local_address: &str, cancel: &AtomicBool) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }
        let address = parse_ipv4(local_address)?;

        let listener = GloveListener::bind(
            address,
            self.inner.config.port,
            self.inner.config.accept_poll_interval(),
        )?;
        self.accept_from(listener, cancel)
    }

    /// Accept the glove on an already bound listener and verify the handshake
    pub fn accept_from(&self, listener: GloveListener, cancel: &AtomicBool) -> Result<()> {
        {
            let connection = self.inner.connection.lock();
            if connection.is_some() {
                return Err(Error::AlreadyConnected);
            }
            self.set_state(LinkState::Listening);
        }

        let accepted = listener.accept(cancel).and_then(|(stream, _addr)| {
            let mut transport = TcpTransport::new(stream)?;
            verify_handshake(&mut transport)?;
            Ok(transport)
        });

        let result = accepted.and_then(|transport| self.attach(Box::new(transport)));
        if result.is_err() {
            // Another handle may have connected meanwhile
            let connection = self.inner.connection.lock();
            if connection.is_none() {
                self.set_state(LinkState::Disconnected);
            } else {
                self.set_state(LinkState::Connected);
            }
        }
        result
    }

    /// Use an already established transport as the connection
    pub fn attach(&self, transport: Box<dyn Transport>) -> Result<()> {
        let mut connection = self.inner.connection.lock();
        if connection.is_some() {
            return Err(Error::AlreadyConnected);
        }
        *connection = Some(transport);
        self.set_state(LinkState::Connected);
        log::info!("Glove connected");
        Ok(())
    }

    /// Close the connection
    ///
    /// Calling this without a connection only logs a warning.
    pub fn disconnect(&self) {
        let mut connection = self.inner.connection.lock();
        match connection.take() {
            Some(mut transport) => {
                if let Err(e) = transport.shutdown() {
                    log::warn!("Error while closing glove connection: {}", e);
                }
                self.set_state(LinkState::Disconnected);
                log::info!("Glove disconnected");
            }
            None => log::warn!("Glove was already disconnected"),
        }
    }

    /// Run `f` on the connection under the lock
    ///
    /// Transport faults and peer closes tear the connection down.
    fn with_connection<T>(&self, f: impl FnOnce(&mut dyn Transport) -> Result<T>) -> Result<T> {
        let mut connection = self.inner.connection.lock();
        let transport = connection.as_mut().ok_or(Error::Disconnected)?;
        let result = f(transport.as_mut());

        if let Err(ref e) = result {
            if e.is_fatal_to_link() {
                log::error!("Glove link lost: {}", e);
                if let Some(mut transport) = connection.take() {
                    if let Err(close_err) = transport.shutdown() {
                        log::debug!("Closing dead connection failed: {}", close_err);
                    }
                }
                self.set_state(LinkState::Disconnected);
            }
        }
        result
    }

    /// Send a command and return the raw reply (single receive, up to 1024 bytes)
    pub fn exchange(&self, command: &Command) -> Result<Vec<u8>> {
        self.with_connection(|transport| {
            transport.send(encode(command))?;
            let mut buffer = [0u8; MAX_REPLY_LEN];
            let n = transport.recv(&mut buffer)?;
            if n == 0 {
                return Err(Error::EmptyResponse);
            }
            log::trace!("{} -> {:02X?}", command, &buffer[..n]);
            Ok(buffer[..n].to_vec())
        })
    }

    /// Request one dataset, resynchronizing on corrupted frames
    ///
    /// # Errors
    /// - [`Error::ResyncFailed`] after `max_resync_attempts` retransmissions
    /// - [`Error::EmptyResponse`] / [`Error::Io`] on transport faults (not retried)
    pub fn request_dataset(&self) -> Result<Dataset> {
        let max_resync = self.inner.config.max_resync_attempts;
        self.with_connection(|transport| read_dataset(transport, max_resync))
    }

    /// Request `count` consecutive datasets
    pub fn request_datasets(&self, count: usize) -> Result<Vec<Dataset>> {
        (0..count).map(|_| self.request_dataset()).collect()
    }
}

/// Dataset request loop
///
/// The glove echoes `G` first and then the 23 remaining bytes, which are read
/// with a single receive. A short read is an incomplete frame, not a reason
/// to keep waiting: the glove sends nothing more until asked again. A bad
/// frame means the stream is out of step: drop what is buffered and retry.
fn read_dataset(transport: &mut dyn Transport, max_resync: u32) -> Result<Dataset> {
    let mut frame = [0u8; DATASET_FRAME_LEN];
    let mut retransmissions = 0u32;

    loop {
        transport.send(encode(&Command::DATASET))?;
        transport.recv_exact(&mut frame[..1])?;
        let n = transport.recv(&mut frame[1..])?;
        if n == 0 {
            return Err(Error::EmptyResponse);
        }

        match decode_dataset(&frame[..1 + n]) {
            Ok(dataset) => {
                if retransmissions > 0 {
                    log::debug!("Resynchronized after {} retransmissions", retransmissions);
                }
                return Ok(dataset);
            }
            Err(defect) => {
                let discarded = transport.discard_pending()?;
                log::warn!(
                    "Corrupted dataset frame ({}), discarded {} buffered bytes",
                    defect,
                    discarded
                );
                if retransmissions >= max_resync {
                    return Err(Error::ResyncFailed {
                        attempts: retransmissions,
                    });
                }
                retransmissions += 1;
            }
        }
    }
}
