#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output state of a zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ZoneState {
    /// Nothing within the threshold distance
    #[default]
    Inactive,
    /// An object is within the threshold distance
    Active,
}

impl ZoneState {
    pub fn is_active(&self) -> bool {
        matches!(self, ZoneState::Active)
    }
}

/// Edge emitted when a zone changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ZoneEvent {
    Activated,
    Deactivated,
}

impl ZoneEvent {
    /// State the zone is in after this event.
    pub fn target_state(&self) -> ZoneState {
        match self {
            ZoneEvent::Activated => ZoneState::Active,
            ZoneEvent::Deactivated => ZoneState::Inactive,
        }
    }
}

/// A state change of one configured zone.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneTransition {
    /// Index of the zone in configuration order.
    pub zone: usize,
    pub name: String,
    pub event: ZoneEvent,
}

/// Point-in-time copy of a zone, safe to hand to another thread.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneSnapshot {
    pub name: String,
    pub state: ZoneState,
    /// Number of degrees that hold a measurement.
    pub observed_degrees: usize,
    /// Smallest distance currently held by the zone, in millimeters.
    pub nearest_distance: Option<u16>,
}
