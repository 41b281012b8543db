use crate::error::LidarError;
use ldlidar_data::{Frame, ZoneTransition};
use log::{debug, info, warn};

/// Hooks invoked by the pipeline on notable events. All methods default to no-ops.
pub trait PipelineObserver {
    fn on_frame_decoded(&mut self, _frame: &Frame) {}
    fn on_transition(&mut self, _transition: &ZoneTransition) {}
    fn on_recoverable_error(&mut self, _error: &LidarError) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// Writes pipeline events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_frame_decoded(&mut self, frame: &Frame) {
        debug!(
            "Frame: speed = {} deg/s, {:.2} -> {:.2} deg, timestamp = {} ms",
            frame.rotation_speed,
            frame.start_angle(),
            frame.end_angle(),
            frame.timestamp
        );
    }

    fn on_transition(&mut self, transition: &ZoneTransition) {
        info!(
            "Zone {} (#{}) {:?}",
            transition.name, transition.zone, transition.event
        );
    }

    fn on_recoverable_error(&mut self, error: &LidarError) {
        warn!("Cycle abandoned: {}", error);
    }
}
