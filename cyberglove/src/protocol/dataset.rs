//! Sensor dataset returned by the `G` command

use super::constants::DATASET_VALUES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// One sample of all 22 glove sensors.
///
/// Values are raw 8-bit readings (the glove reports 1-255). Converting them
/// to joint angles is left to calibration code outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dataset {
    values: [u8; DATASET_VALUES],
}

impl Dataset {
    pub const fn new(values: [u8; DATASET_VALUES]) -> Self {
        Self { values }
    }

    /// Raw sensor values in glove order
    #[inline]
    pub fn values(&self) -> &[u8; DATASET_VALUES] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        DATASET_VALUES
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().copied()
    }
}

impl Index<usize> for Dataset {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.values[index]
    }
}

impl From<[u8; DATASET_VALUES]> for Dataset {
    fn from(values: [u8; DATASET_VALUES]) -> Self {
        Self::new(values)
    }
}

/// Formats as `(v0, v1, ..., v21)`, one dataset per line in recordings
impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_str(")")
    }
}
