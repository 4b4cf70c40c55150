//! CyberGlove III wire protocol
//!
//! Commands are sent as bare ASCII. Query replies echo the command, carry a
//! payload and end with a zero byte. Dataset replies are fixed 24-byte frames.

pub mod codec;
pub mod command;
pub mod constants;
pub mod dataset;

pub use codec::{decode_dataset, decode_echo, encode, FrameDefect};
pub use command::Command;
pub use dataset::Dataset;
