//! Transport layer for glove I/O

use crate::error::{Error, Result};

mod tcp;
pub use tcp::TcpTransport;

#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;

/// Byte stream to the glove
///
/// Reads block until data arrives; a read of zero bytes means the peer
/// closed the connection.
pub trait Transport: Send {
    /// Write all bytes
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read available data into buffer, returns number of bytes read
    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Fill the whole buffer
    ///
    /// Fails with [`Error::EmptyResponse`] if the peer closes first.
    fn recv_exact(&mut self, buffer: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buffer.len() {
            let n = self.recv(&mut buffer[filled..])?;
            if n == 0 {
                return Err(Error::EmptyResponse);
            }
            filled += n;
        }
        Ok(())
    }

    /// Drop whatever is already buffered without waiting for more
    ///
    /// Best-effort; returns the number of bytes discarded.
    fn discard_pending(&mut self) -> Result<usize>;

    /// Close the connection
    fn shutdown(&mut self) -> Result<()>;
}
