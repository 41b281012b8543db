#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single range sample reported by the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Distance to an object in millimeters.
    pub distance: u16,
    /// Return strength of the laser pulse.
    pub intensity: u8,
}

impl Measurement {
    pub fn new(distance: u16, intensity: u8) -> Measurement {
        Measurement {
            distance,
            intensity,
        }
    }
}

/// A measurement together with its interpolated angle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnglePoint {
    pub measurement: Measurement,
    /// Angle in degrees, always within `[0, 360)`.
    pub angle: f64,
}
