//! Mock transport for testing

use super::Transport;
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Arc;

/// In-memory stand-in for the glove
///
/// Replies are produced when a request is sent: scripted replies are used
/// first (one per send), then standing replies keyed by the exact request
/// bytes. Reading with nothing buffered returns 0, i.e. the peer closed.
///
/// Clones share state, so a test can keep one clone for inspection after
/// handing the other to a link.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Default)]
struct MockTransportInner {
    read_buffer: VecDeque<u8>,
    scripted: VecDeque<Vec<u8>>,
    standing: HashMap<Vec<u8>, Vec<u8>>,
    written: Vec<Vec<u8>>,
    discarded: usize,
    shut_down: bool,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject data to be read without a preceding request
    pub fn inject_read(&self, data: &[u8]) {
        self.inner.lock().read_buffer.extend(data);
    }

    /// Queue a reply for the next request, whatever it is
    pub fn push_reply(&self, reply: &[u8]) {
        self.inner.lock().scripted.push_back(reply.to_vec());
    }

    /// Reply to every `request` with `reply` once the script is exhausted
    pub fn respond_to(&self, request: &[u8], reply: &[u8]) {
        self.inner
            .lock()
            .standing
            .insert(request.to_vec(), reply.to_vec());
    }

    /// All requests sent so far
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.inner.lock().written.clone()
    }

    /// Number of times `request` was sent
    pub fn count_written(&self, request: &[u8]) -> usize {
        self.inner
            .lock()
            .written
            .iter()
            .filter(|w| w.as_slice() == request)
            .count()
    }

    /// Bytes dropped by `discard_pending`
    pub fn discarded(&self) -> usize {
        self.inner.lock().discarded
    }

    /// Bytes still waiting to be read
    pub fn pending(&self) -> usize {
        self.inner.lock().read_buffer.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.lock().shut_down
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.shut_down {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock transport shut down").into());
        }
        inner.written.push(data.to_vec());

        let reply = match inner.scripted.pop_front() {
            Some(reply) => Some(reply),
            None => inner.standing.get(data).cloned(),
        };
        if let Some(reply) = reply {
            inner.read_buffer.extend(reply);
        }
        Ok(())
    }

    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        let available = inner.read_buffer.len().min(buffer.len());
        for (slot, byte) in buffer.iter_mut().zip(inner.read_buffer.drain(..available)) {
            *slot = byte;
        }
        Ok(available)
    }

    fn discard_pending(&mut self) -> Result<usize> {
        let mut inner = self.inner.lock();
        let n = inner.read_buffer.len();
        inner.read_buffer.clear();
        inner.discarded += n;
        Ok(n)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.inner.lock().shut_down = true;
        Ok(())
    }
}
