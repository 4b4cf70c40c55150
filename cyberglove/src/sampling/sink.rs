//! Dataset consumers

use crate::error::{Error, Result};
use crate::protocol::Dataset;
use crossbeam_channel::Sender;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Receives every dataset produced by a sampling session
///
/// Called from the sampling thread. An error ends the session and becomes
/// the session's result.
pub trait DatasetSink: Send {
    fn write(&mut self, dataset: &Dataset) -> Result<()>;

    /// Called once when the sampling loop exits
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Records datasets to a text file, one `(v0, v1, ..., v21)` line each
pub struct TextFileSink {
    writer: BufWriter<File>,
    lines: u64,
}

impl TextFileSink {
    /// Create (or truncate) the recording file
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::Sink(format!("cannot create {}: {}", path.display(), e)))?;
        log::info!("Recording datasets to {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Lines written so far
    pub fn lines(&self) -> u64 {
        self.lines
    }
}

impl DatasetSink for TextFileSink {
    fn write(&mut self, dataset: &Dataset) -> Result<()> {
        writeln!(self.writer, "{}", dataset).map_err(|e| Error::Sink(e.to_string()))?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| Error::Sink(e.to_string()))
    }
}

impl DatasetSink for Sender<Dataset> {
    fn write(&mut self, dataset: &Dataset) -> Result<()> {
        self.send(*dataset)
            .map_err(|_| Error::Sink("dataset receiver disconnected".to_string()))
    }
}

/// Adapter turning a closure into a sink
pub struct FnSink<F>(F);

/// Wrap `f` as a [`DatasetSink`]
pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(&Dataset) -> Result<()> + Send,
{
    FnSink(f)
}

impl<F> DatasetSink for FnSink<F>
where
    F: FnMut(&Dataset) -> Result<()> + Send,
{
    fn write(&mut self, dataset: &Dataset) -> Result<()> {
        (self.0)(dataset)
    }
}
