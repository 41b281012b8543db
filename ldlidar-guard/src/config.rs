use crate::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PORT_NAME, DEFAULT_READ_TIMEOUT_MS,
    DEFAULT_THRESHOLD_MM,
};
use crate::error::LidarError;
use crate::zone::{AggregationMode, Zone};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

fn default_threshold() -> u16 {
    DEFAULT_THRESHOLD_MM
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    pub angle_start: u16,
    pub angle_end: u16,
    /// Millimeters.
    #[serde(default = "default_threshold")]
    pub threshold: u16,
    #[serde(default)]
    pub mode: AggregationMode,
}

impl ZoneConfig {
    pub fn new(name: &str, angle_start: u16, angle_end: u16, threshold: u16) -> ZoneConfig {
        ZoneConfig {
            name: name.to_string(),
            angle_start,
            angle_end,
            threshold,
            mode: AggregationMode::default(),
        }
    }
}

/// Everything needed to run a guard against a serial sensor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Serial port name such as `/dev/ttyUSB0`.
    pub port: String,
    pub baud_rate: u32,
    /// Deadline for reading one complete frame.
    pub read_timeout_ms: u64,
    /// Longest single blocking read on the transport.
    pub poll_interval_ms: u64,
    pub verify_checksum: bool,
    /// Zones in output order.
    pub zones: Vec<ZoneConfig>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            port: DEFAULT_PORT_NAME.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            verify_checksum: false,
            zones: vec![
                ZoneConfig::new("left", 210, 250, DEFAULT_THRESHOLD_MM),
                ZoneConfig::new("center", 251, 290, DEFAULT_THRESHOLD_MM),
                ZoneConfig::new("right", 291, 330, DEFAULT_THRESHOLD_MM),
            ],
        }
    }
}

impl GuardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LidarError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(LidarError::ConfigIo)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, LidarError> {
        let config: GuardConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LidarError> {
        if self.zones.is_empty() {
            return Err(LidarError::InvalidConfig(
                "at least one zone is required".to_string(),
            ));
        }
        if self.baud_rate == 0 || self.read_timeout_ms == 0 || self.poll_interval_ms == 0 {
            return Err(LidarError::InvalidConfig(
                "baud rate and timeouts must be non-zero".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for zone in &self.zones {
            if zone.name.is_empty() {
                return Err(LidarError::InvalidConfig("zone name is empty".to_string()));
            }
            if !names.insert(zone.name.as_str()) {
                return Err(LidarError::InvalidConfig(format!(
                    "zone \"{}\" is defined twice",
                    zone.name
                )));
            }
            if zone.angle_start >= 360 || zone.angle_end >= 360 {
                return Err(LidarError::InvalidConfig(format!(
                    "zone \"{}\" must lie within [0, 360)",
                    zone.name
                )));
            }
        }
        Ok(())
    }

    pub fn build_zones(&self) -> Result<Vec<Zone>, LidarError> {
        self.zones
            .iter()
            .map(|z| Zone::new(&z.name, z.angle_start, z.angle_end, z.threshold, z.mode))
            .collect()
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
