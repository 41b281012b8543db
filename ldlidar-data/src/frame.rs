use crate::measurement::Measurement;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of measurements carried by every frame.
pub const MEASUREMENTS_PER_FRAME: usize = 12;

/// One decoded sensor frame.
///
/// Angles are kept in their raw wire representation (hundredths of a degree)
/// so that a frame re-encodes to exactly the bytes it was decoded from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Sync byte, `0x54` on every valid frame.
    pub header: u8,
    /// Upper three bits of the count byte.
    pub packet_type: u8,
    /// Lower five bits of the count byte. Always 12 for accepted frames.
    pub declared_count: u8,
    /// Rotation speed in degrees per second.
    pub rotation_speed: u16,
    pub start_angle_raw: u16,
    /// Samples in angular order.
    pub measurements: [Measurement; MEASUREMENTS_PER_FRAME],
    pub end_angle_raw: u16,
    /// Sensor timestamp in milliseconds. Wraps at 30000 on real hardware.
    pub timestamp: u16,
    pub checksum: u8,
}

impl Frame {
    /// Start angle in degrees.
    pub fn start_angle(&self) -> f64 {
        (self.start_angle_raw as f64) / 100.
    }

    /// End angle in degrees.
    pub fn end_angle(&self) -> f64 {
        (self.end_angle_raw as f64) / 100.
    }
}
