use std::io;

#[derive(Debug, thiserror::Error)]
pub enum LidarError {
    #[error("No valid frame header arrived before the read deadline.")]
    SyncTimeout,
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
    #[error("Checksum mismatched. Calculated = {calculated:02X}, expected = {expected:02X}.")]
    ChecksumMismatch { expected: u8, calculated: u8 },
    #[error("Transport closed")]
    TransportClosed,
    #[error("Operation cancelled by stop signal")]
    Cancelled,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[source] io::Error),
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    #[error(transparent)]
    SerialError(#[from] serialport::Error),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl LidarError {
    /// Recoverable errors abandon the current cycle only.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LidarError::SyncTimeout
                | LidarError::MalformedFrame(_)
                | LidarError::ChecksumMismatch { .. }
        )
    }
}
