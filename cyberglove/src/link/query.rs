//! Typed glove queries
//!
//! Each query sends one `?x` command, strips the echo and terminator from the
//! reply and interprets the payload. Query replies are not resynchronized: a
//! malformed reply is a [`Error::Protocol`] for the caller to handle.

use super::DeviceLink;
use crate::error::{Error, Result};
use crate::protocol::constants::{
    STATUS_NOT_PLUGGED_INITIALIZED, STATUS_NOT_PLUGGED_NOT_INITIALIZED,
    STATUS_PLUGGED_INITIALIZED, STATUS_PLUGGED_NOT_INITIALIZED,
};
use crate::protocol::{decode_echo, Command};
use std::fmt;

/// Glove status reported by `?G`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GloveStatus {
    NotPluggedNotInitialized,
    NotPluggedInitialized,
    PluggedNotInitialized,
    PluggedInitialized,
    /// Any other status byte
    Unexpected(u8),
}

impl GloveStatus {
    pub fn from_byte(value: u8) -> Self {
        match value {
            STATUS_NOT_PLUGGED_NOT_INITIALIZED => GloveStatus::NotPluggedNotInitialized,
            STATUS_NOT_PLUGGED_INITIALIZED => GloveStatus::NotPluggedInitialized,
            STATUS_PLUGGED_NOT_INITIALIZED => GloveStatus::PluggedNotInitialized,
            STATUS_PLUGGED_INITIALIZED => GloveStatus::PluggedInitialized,
            other => GloveStatus::Unexpected(other),
        }
    }

    /// True only when plugged in and initialized properly
    pub fn is_ready(&self) -> bool {
        *self == GloveStatus::PluggedInitialized
    }
}

impl fmt::Display for GloveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GloveStatus::NotPluggedNotInitialized => {
                f.write_str("Cyberglove not plugged in and not initialized properly")
            }
            GloveStatus::NotPluggedInitialized => {
                f.write_str("Cyberglove not plugged in but initialized properly")
            }
            GloveStatus::PluggedNotInitialized => {
                f.write_str("Cyberglove plugged in but not initialized properly")
            }
            GloveStatus::PluggedInitialized => {
                f.write_str("Cyberglove plugged in and initialized properly")
            }
            GloveStatus::Unexpected(value) => write!(f, "Error - unexpected answer: {}", value),
        }
    }
}

/// Version numbers reported by `?V`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GloveVersion {
    /// Glove firmware version
    pub firmware: u16,
    /// Internal information format version
    pub format: u16,
}

impl fmt::Display for GloveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "firmware {}, format {}", self.firmware, self.format)
    }
}

fn first_byte(command: &Command, payload: &[u8]) -> Result<u8> {
    payload
        .first()
        .copied()
        .ok_or_else(|| Error::Protocol(format!("empty payload in reply to {:?}", command.as_str())))
}

/// Decode the `?i` payload
pub fn parse_information(payload: &[u8]) -> Result<String> {
    String::from_utf8(payload.to_vec())
        .map_err(|e| Error::Protocol(format!("information text is not UTF-8: {}", e)))
}

/// Decode the `?S` payload (18 or 22 on real gloves, not validated)
pub fn parse_sensor_count(payload: &[u8]) -> Result<u8> {
    first_byte(&Command::SENSOR_COUNT, payload)
}

/// Decode the `?G` payload
pub fn parse_status(payload: &[u8]) -> Result<GloveStatus> {
    first_byte(&Command::STATUS, payload).map(GloveStatus::from_byte)
}

/// Decode the `?R` payload
pub fn parse_right_handed(payload: &[u8]) -> Result<bool> {
    first_byte(&Command::RIGHT_HANDED, payload).map(|b| b == 1)
}

/// Decode the `?V` payload: two big-endian u16
pub fn parse_version(payload: &[u8]) -> Result<GloveVersion> {
    if payload.len() < 4 {
        return Err(Error::Protocol(format!(
            "version payload is {} bytes, need 4",
            payload.len()
        )));
    }
    Ok(GloveVersion {
        firmware: u16::from_be_bytes([payload[0], payload[1]]),
        format: u16::from_be_bytes([payload[2], payload[3]]),
    })
}

impl DeviceLink {
    /// Send a query command and return its payload (echo and terminator removed)
    pub fn query(&self, command: &Command) -> Result<Vec<u8>> {
        let raw = self.exchange(command)?;
        let payload = decode_echo(command, &raw)?;
        log::debug!("{} payload: {:02X?}", command, payload);
        Ok(payload.to_vec())
    }

    /// Information text from the glove microcontroller (`?i`)
    pub fn information(&self) -> Result<String> {
        parse_information(&self.query(&Command::INFORMATION)?)
    }

    /// Number of sensors on the connected glove (`?S`)
    pub fn sensor_count(&self) -> Result<u8> {
        parse_sensor_count(&self.query(&Command::SENSOR_COUNT)?)
    }

    /// Plugged/initialized status (`?G`)
    pub fn status(&self) -> Result<GloveStatus> {
        parse_status(&self.query(&Command::STATUS)?)
    }

    /// True if the glove is tailored for a right hand (`?R`)
    pub fn is_right_handed(&self) -> Result<bool> {
        parse_right_handed(&self.query(&Command::RIGHT_HANDED)?)
    }

    /// Firmware and format version (`?V`)
    pub fn version(&self) -> Result<GloveVersion> {
        parse_version(&self.query(&Command::VERSION)?)
    }
}
