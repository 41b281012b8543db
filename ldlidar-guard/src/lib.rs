//! Proximity guard for LD-series rotating LiDARs (LD06, LD19).
//!
//! A [`Pipeline`] pulls 47-byte frames from a [`ByteSource`], interpolates the
//! angle of each of their 12 measurements, files them into angular [`Zone`]s
//! and switches an [`ActuatorDriver`] output whenever a zone sees an object
//! at or below its threshold distance.

mod actuator;
mod config;
mod constants;
mod decode;
mod driver_threads;
mod error;
mod numeric;
mod observer;
mod packet;
mod pipeline;
mod scan;
mod serial;
mod source;
mod stop;
#[cfg(test)]
mod testing;
mod zone;

use crossbeam_channel::Receiver;
use ldlidar_data::ZoneSnapshot;

pub use crate::actuator::{
    actuate, deactivate_all, ActuatorDriver, ChannelActuator, LogActuator, ZoneStateMachine,
};
pub use crate::config::{GuardConfig, ZoneConfig};
pub use crate::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PORT_NAME, DEFAULT_READ_TIMEOUT_MS,
    DEFAULT_THRESHOLD_MM,
};
pub use crate::decode::{calc_checksum, decode, encode, seal, FrameDecoder};
pub use crate::driver_threads::{join, spawn_guard, GuardThread};
pub use crate::error::LidarError;
pub use crate::observer::{LogObserver, NullObserver, PipelineObserver};
pub use crate::packet::{FrameSynchronizer, RawFrame};
pub use crate::pipeline::{Pipeline, PipelineStats};
pub use crate::scan::{angle_step, angles_for, points_within, AnglePoints};
pub use crate::serial::{open_port, SerialSource};
pub use crate::source::{ByteSource, ReplaySource};
pub use crate::stop::{stop_channel, StopHandle, StopSignal};
pub use crate::zone::{update_zones, AggregationMode, Zone};

/// Function to launch the guard on a serial sensor.
/// # Arguments
///
/// * `config` - Port settings and zones.
/// * `actuator` - Receives an output change whenever a zone changes state.
pub fn run_guard<A>(
    config: &GuardConfig,
    actuator: A,
) -> Result<(GuardThread, Receiver<Vec<ZoneSnapshot>>), LidarError>
where
    A: ActuatorDriver + Send + 'static,
{
    config.validate()?;
    let source = SerialSource::open(config)?;
    let pipeline = Pipeline::new(source, config, actuator)?;
    Ok(spawn_guard(pipeline))
}
