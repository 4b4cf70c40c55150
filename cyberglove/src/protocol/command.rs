//! Glove command strings

use super::constants::{
    CMD_DATASET, CMD_INFORMATION, CMD_RIGHT_HANDED, CMD_SENSOR_COUNT, CMD_STATUS, CMD_VERSION,
    MAX_COMMAND_LEN,
};
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::fmt;

/// A 1-2 character ASCII command understood by the glove.
///
/// Predefined commands are available as associated constants. Arbitrary
/// commands typed by a user go through [`Command::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command(Cow<'static, str>);

impl Command {
    /// `G`: request one 8-bit dataset
    pub const DATASET: Command = Command(Cow::Borrowed(CMD_DATASET));
    /// `?i`: information text
    pub const INFORMATION: Command = Command(Cow::Borrowed(CMD_INFORMATION));
    /// `?S`: number of sensors
    pub const SENSOR_COUNT: Command = Command(Cow::Borrowed(CMD_SENSOR_COUNT));
    /// `?G`: glove status
    pub const STATUS: Command = Command(Cow::Borrowed(CMD_STATUS));
    /// `?R`: handedness
    pub const RIGHT_HANDED: Command = Command(Cow::Borrowed(CMD_RIGHT_HANDED));
    /// `?V`: version numbers
    pub const VERSION: Command = Command(Cow::Borrowed(CMD_VERSION));

    /// Validate a user-supplied command
    pub fn parse(text: &str) -> Result<Self> {
        let valid = !text.is_empty()
            && text.len() <= MAX_COMMAND_LEN
            && text.bytes().all(|b| b.is_ascii_graphic());
        if !valid {
            return Err(Error::InvalidCommand(text.to_string()));
        }
        Ok(Command(Cow::Owned(text.to_string())))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Command length in bytes (= echo length in the reply)
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
