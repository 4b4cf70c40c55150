//! Frame encoding and decoding
//!
//! Frame formats:
//!
//! ```text
//! Request:        [COMMAND ASCII (1-2 bytes)]                 no delimiter
//! Query reply:    [ECHO (len(cmd))] [PAYLOAD] [0x00]
//! Dataset reply:  [0x47 'G'] [22 x u8 sensor values] [0x00]   always 24 bytes
//! ```
//!
//! A malformed dataset frame is an expected condition (the link drifts out of
//! step now and then) and is reported as a [`FrameDefect`] value, leaving the
//! retry policy to the link. Malformed query replies are protocol errors.

use super::command::Command;
use super::constants::{DATASET_ECHO, DATASET_FRAME_LEN, DATASET_VALUES, FRAME_TERMINATOR};
use super::dataset::Dataset;
use crate::error::{Error, Result};
use std::fmt;

/// Reason a dataset frame was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDefect {
    /// Frame is not exactly 24 bytes
    Length(usize),
    /// First byte is not the `G` echo
    Echo(u8),
    /// Last byte is not the zero terminator
    Terminator(u8),
}

impl fmt::Display for FrameDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDefect::Length(len) => {
                write!(f, "length {} (expected {})", len, DATASET_FRAME_LEN)
            }
            FrameDefect::Echo(b) => write!(f, "echo byte 0x{:02X} (expected 0x47)", b),
            FrameDefect::Terminator(b) => write!(f, "terminator 0x{:02X} (expected 0x00)", b),
        }
    }
}

/// Encode a command for the wire (ASCII, verbatim)
#[inline]
pub fn encode(command: &Command) -> &[u8] {
    command.as_bytes()
}

/// Strip the echoed command and the trailing terminator from a query reply.
///
/// The echo itself is not compared against the command.
pub fn decode_echo<'a>(command: &Command, raw: &'a [u8]) -> Result<&'a [u8]> {
    let min_len = command.len() + 1;
    if raw.len() < min_len {
        return Err(Error::Protocol(format!(
            "reply to {:?} is {} bytes, need at least {}",
            command.as_str(),
            raw.len(),
            min_len
        )));
    }
    Ok(&raw[command.len()..raw.len() - 1])
}

/// Validate a dataset frame and extract its 22 values
pub fn decode_dataset(raw: &[u8]) -> std::result::Result<Dataset, FrameDefect> {
    if raw.len() != DATASET_FRAME_LEN {
        return Err(FrameDefect::Length(raw.len()));
    }
    if raw[0] != DATASET_ECHO {
        return Err(FrameDefect::Echo(raw[0]));
    }
    let last = raw[DATASET_FRAME_LEN - 1];
    if last != FRAME_TERMINATOR {
        return Err(FrameDefect::Terminator(last));
    }

    let mut values = [0u8; DATASET_VALUES];
    values.copy_from_slice(&raw[1..=DATASET_VALUES]);
    Ok(Dataset::new(values))
}

/// Build a valid dataset frame (glove side of the protocol)
pub fn dataset_frame(dataset: &Dataset) -> [u8; DATASET_FRAME_LEN] {
    let mut frame = [FRAME_TERMINATOR; DATASET_FRAME_LEN];
    frame[0] = DATASET_ECHO;
    frame[1..=DATASET_VALUES].copy_from_slice(dataset.values());
    frame
}

/// Build an echo-prefixed reply (glove side of the protocol)
pub fn echo_reply(command: &Command, payload: &[u8]) -> Vec<u8> {
    let mut reply = Vec::with_capacity(command.len() + payload.len() + 1);
    reply.extend_from_slice(command.as_bytes());
    reply.extend_from_slice(payload);
    reply.push(FRAME_TERMINATOR);
    reply
}
