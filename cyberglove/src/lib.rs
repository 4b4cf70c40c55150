//! CyberGlove - Host-side driver for the CyberGlove III data glove
//!
//! The glove joins the network as a TCP client and dials the host's static
//! address. This library listens for it, verifies its handshake and then
//! drives the single-character command protocol: queries for status and
//! identity, and 22-value joint-angle datasets, one at a time or streamed
//! continuously to a sink.
//!
//! ## Features
//!
//! - `mock`: Enable the in-memory [`transport::MockTransport`] for hardware-free testing

pub mod config;
pub mod error;
pub mod link;
pub mod protocol;
pub mod sampling;
pub mod transport;

// Re-export commonly used types
pub use config::GloveConfig;
pub use error::{Error, Result};
pub use link::{DeviceLink, GloveStatus, GloveVersion, LinkState};
pub use protocol::{Command, Dataset};
pub use sampling::{DatasetSink, SamplingHandle, SamplingReport, SamplingSession, TextFileSink};
