//! Continuous sampling
//!
//! A [`SamplingSession`] runs a producer thread that requests datasets back
//! to back and hands each one to a [`DatasetSink`]. There is no throttling:
//! the rate is whatever the glove and the network sustain.
//!
//! ```no_run
//! use cyberglove::config::LinkConfig;
//! use cyberglove::link::DeviceLink;
//! use cyberglove::sampling::{SamplingSession, TextFileSink};
//!
//! let link = DeviceLink::new(LinkConfig::default());
//! let mut session = SamplingSession::new(link);
//! let handle = session.start(TextFileSink::create("output.txt")?)?;
//! // ...
//! let report = session.stop(handle)?;
//! println!("{} datasets", report.datasets);
//! # Ok::<(), cyberglove::Error>(())
//! ```

mod sink;

pub use sink::{from_fn, DatasetSink, FnSink, TextFileSink};

use crate::error::{Error, Result};
use crate::link::DeviceLink;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Lifecycle of a sampling session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    StopRequested,
    Stopped,
}

/// Outcome of a completed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingReport {
    /// Datasets delivered to the sink
    pub datasets: u64,
}

/// Owner of the sampling lifecycle for one link
pub struct SamplingSession {
    link: DeviceLink,
    state: Arc<Mutex<SessionState>>,
}

impl SamplingSession {
    pub fn new(link: DeviceLink) -> Self {
        Self {
            link,
            state: Arc::new(Mutex::new(SessionState::Idle)),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn link(&self) -> &DeviceLink {
        &self.link
    }

    /// Spawn the sampling thread
    ///
    /// # Errors
    /// - [`Error::SessionActive`] if a previous start has not been stopped
    /// - [`Error::Io`] if the thread cannot be spawned
    pub fn start<S>(&mut self, sink: S) -> Result<SamplingHandle>
    where
        S: DatasetSink + 'static,
    {
        {
            let mut state = self.state.lock();
            if matches!(*state, SessionState::Running | SessionState::StopRequested) {
                return Err(Error::SessionActive);
            }
            *state = SessionState::Running;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let datasets = Arc::new(AtomicU64::new(0));

        let spawned = {
            let link = self.link.clone();
            let stop = Arc::clone(&stop);
            let datasets = Arc::clone(&datasets);
            thread::Builder::new()
                .name("glove-sampler".to_string())
                .spawn(move || sampling_loop(link, sink, stop, datasets))
        };

        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                *self.state.lock() = SessionState::Idle;
                return Err(e.into());
            }
        };

        log::info!("Sampling started");
        Ok(SamplingHandle {
            thread: Some(thread),
            stop,
            datasets,
            state: Arc::clone(&self.state),
        })
    }

    /// Stop sampling and wait for the thread to exit
    ///
    /// Returns the error that ended the loop if it stopped on its own.
    pub fn stop(&mut self, mut handle: SamplingHandle) -> Result<SamplingReport> {
        handle.finish()
    }
}

/// Running session, consumed by [`SamplingSession::stop`]
///
/// Dropping the handle also stops the thread, discarding its result.
pub struct SamplingHandle {
    thread: Option<JoinHandle<Result<u64>>>,
    stop: Arc<AtomicBool>,
    datasets: Arc<AtomicU64>,
    state: Arc<Mutex<SessionState>>,
}

impl SamplingHandle {
    /// True once the sampling thread has exited (after stop or on an error)
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Datasets delivered so far
    pub fn datasets(&self) -> u64 {
        self.datasets.load(Ordering::Relaxed)
    }

    fn finish(&mut self) -> Result<SamplingReport> {
        let Some(thread) = self.thread.take() else {
            return Ok(SamplingReport {
                datasets: self.datasets(),
            });
        };

        *self.state.lock() = SessionState::StopRequested;
        self.stop.store(true, Ordering::SeqCst);
        log::debug!("Sampling stop requested");

        let joined = thread.join();
        *self.state.lock() = SessionState::Stopped;

        match joined {
            Ok(Ok(datasets)) => {
                log::info!("Sampling stopped after {} datasets", datasets);
                Ok(SamplingReport { datasets })
            }
            Ok(Err(e)) => {
                log::error!("Sampling ended with error: {}", e);
                Err(e)
            }
            Err(_) => Err(Error::ThreadPanic),
        }
    }
}

impl Drop for SamplingHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            if let Err(e) = self.finish() {
                log::debug!("Discarded sampling result: {}", e);
            }
        }
    }
}

/// Producer loop: request, deliver, repeat until told to stop
fn sampling_loop<S: DatasetSink>(
    link: DeviceLink,
    mut sink: S,
    stop: Arc<AtomicBool>,
    datasets: Arc<AtomicU64>,
) -> Result<u64> {
    log::debug!("Sampling thread started");

    let result = loop {
        if stop.load(Ordering::SeqCst) {
            break Ok(());
        }
        let step = link
            .request_dataset()
            .and_then(|dataset| sink.write(&dataset));
        if let Err(e) = step {
            break Err(e);
        }
        datasets.fetch_add(1, Ordering::Relaxed);
    };

    let flushed = sink.flush();
    let count = datasets.load(Ordering::Relaxed);
    log::debug!("Sampling thread exiting after {} datasets", count);
    result.and(flushed).map(|_| count)
}
