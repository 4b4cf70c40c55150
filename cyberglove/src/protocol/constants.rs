//! Constants for the CyberGlove III TCP protocol

// Default TCP port the glove is configured to connect to
pub const DEFAULT_PORT: u16 = 49500;

// Handshake byte sent by the glove right after it connects
pub const HANDSHAKE_BYTE: u8 = b'o';

// Command strings
pub const CMD_DATASET: &str = "G"; // One 8-bit dataset
pub const CMD_INFORMATION: &str = "?i"; // Information text
pub const CMD_SENSOR_COUNT: &str = "?S"; // Number of sensors (18 or 22)
pub const CMD_STATUS: &str = "?G"; // Plugged/initialized status
pub const CMD_RIGHT_HANDED: &str = "?R"; // 1 = right hand
pub const CMD_VERSION: &str = "?V"; // Firmware + format version (2x u16 BE)

// Maximum command length in characters
pub const MAX_COMMAND_LEN: usize = 2;

// Dataset frame layout: ECHO(1) + VALUES(22) + TERMINATOR(1)
pub const DATASET_ECHO: u8 = b'G'; // 0x47
pub const DATASET_VALUES: usize = 22;
pub const DATASET_FRAME_LEN: usize = DATASET_VALUES + 2;
pub const FRAME_TERMINATOR: u8 = 0x00;

// Receive buffer for variable-length replies
pub const MAX_REPLY_LEN: usize = 1024;

// Timing constants
pub const ACCEPT_POLL_INTERVAL_MS: u64 = 100;

// Retransmissions allowed while resynchronizing dataset frames
pub const DEFAULT_MAX_RESYNC_ATTEMPTS: u32 = 16;

// Status codes returned by `?G`
pub const STATUS_NOT_PLUGGED_NOT_INITIALIZED: u8 = 0;
pub const STATUS_NOT_PLUGGED_INITIALIZED: u8 = 1;
pub const STATUS_PLUGGED_NOT_INITIALIZED: u8 = 2;
pub const STATUS_PLUGGED_INITIALIZED: u8 = 3;
