use crate::actuator::{actuate, deactivate_all, ActuatorDriver};
use crate::config::GuardConfig;
use crate::decode::FrameDecoder;
use crate::error::LidarError;
use crate::observer::{LogObserver, PipelineObserver};
use crate::packet::FrameSynchronizer;
use crate::scan::angles_for;
use crate::source::ByteSource;
use crate::stop::StopSignal;
use crate::zone::{update_zones, Zone};
use crossbeam_channel::{Sender, TrySendError};
use ldlidar_data::{ZoneSnapshot, ZoneTransition};
use log::{debug, error, info};

/// Counters kept across cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    pub timeouts: u64,
    pub malformed: u64,
    pub checksum_failures: u64,
    pub transitions: u64,
}

/// The sync, decode, interpolate, aggregate, actuate cycle.
///
/// Zones are owned by the pipeline and only mutated from `run_cycle`; other
/// threads see them through [`ZoneSnapshot`] copies.
pub struct Pipeline<S, A> {
    synchronizer: FrameSynchronizer<S>,
    decoder: FrameDecoder,
    zones: Vec<Zone>,
    actuator: A,
    observer: Box<dyn PipelineObserver + Send>,
    snapshot_tx: Option<Sender<Vec<ZoneSnapshot>>>,
    stats: PipelineStats,
}

impl<S: ByteSource, A: ActuatorDriver> Pipeline<S, A> {
    pub fn new(source: S, config: &GuardConfig, actuator: A) -> Result<Self, LidarError> {
        config.validate()?;
        Ok(Pipeline::from_parts(
            FrameSynchronizer::new(source, config.read_timeout()),
            FrameDecoder::new(config.verify_checksum),
            config.build_zones()?,
            actuator,
        ))
    }

    pub fn from_parts(
        synchronizer: FrameSynchronizer<S>,
        decoder: FrameDecoder,
        zones: Vec<Zone>,
        actuator: A,
    ) -> Self {
        Pipeline {
            synchronizer,
            decoder,
            zones,
            actuator,
            observer: Box::new(LogObserver),
            snapshot_tx: None,
            stats: PipelineStats::default(),
        }
    }

    pub fn with_observer<O: PipelineObserver + Send + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Publishes a snapshot of every zone after each cycle. Snapshots are
    /// dropped while the channel is full.
    pub fn with_snapshots(mut self, tx: Sender<Vec<ZoneSnapshot>>) -> Self {
        self.snapshot_tx = Some(tx);
        self
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn resync_count(&self) -> u64 {
        self.synchronizer.resync_count()
    }

    pub fn snapshot(&self) -> Vec<ZoneSnapshot> {
        self.zones.iter().map(Zone::snapshot).collect()
    }

    /// Releases the transport.
    pub fn into_source(self) -> S {
        self.synchronizer.into_inner()
    }

    /// Runs one complete cycle. Nothing reaches the zones unless a whole frame
    /// was read and decoded.
    pub fn run_cycle(&mut self) -> Result<Vec<ZoneTransition>, LidarError> {
        let frame = match self
            .synchronizer
            .sync_and_read_frame()
            .and_then(|raw| self.decoder.decode(&raw))
        {
            Ok(frame) => frame,
            Err(e) => {
                if e.is_recoverable() {
                    self.record_recoverable(&e);
                }
                return Err(e);
            }
        };
        self.stats.frames += 1;
        self.observer.on_frame_decoded(&frame);

        update_zones(&mut self.zones, angles_for(&frame));
        let transitions = actuate(&mut self.zones, &mut self.actuator);
        self.notify(&transitions);
        self.publish_snapshot();
        Ok(transitions)
    }

    /// Cycles until `stop` is raised or a fatal error occurs, then shuts down.
    ///
    /// Returns `Ok(())` after a requested stop and the fatal error otherwise.
    /// Every zone is inactive when this returns.
    pub fn run(&mut self, stop: StopSignal) -> Result<(), LidarError> {
        self.synchronizer.set_stop(stop.clone());
        let result = loop {
            if stop.is_raised() {
                break Ok(());
            }
            match self.run_cycle() {
                Ok(_) => {}
                Err(LidarError::Cancelled) => break Ok(()),
                Err(e) if e.is_recoverable() => {}
                Err(e) => {
                    error!("Stopping guard: {}", e);
                    break Err(e);
                }
            }
        };
        self.shutdown();
        result
    }

    /// Deactivates every zone.
    pub fn shutdown(&mut self) -> Vec<ZoneTransition> {
        let transitions = deactivate_all(&mut self.zones, &mut self.actuator);
        self.notify(&transitions);
        self.publish_snapshot();
        info!("Guard stopped after {} frames", self.stats.frames);
        transitions
    }

    fn record_recoverable(&mut self, e: &LidarError) {
        match e {
            LidarError::SyncTimeout => self.stats.timeouts += 1,
            LidarError::MalformedFrame(_) => self.stats.malformed += 1,
            LidarError::ChecksumMismatch { .. } => self.stats.checksum_failures += 1,
            _ => {}
        }
        self.observer.on_recoverable_error(e);
    }

    fn notify(&mut self, transitions: &[ZoneTransition]) {
        self.stats.transitions += transitions.len() as u64;
        for t in transitions {
            self.observer.on_transition(t);
        }
    }

    fn publish_snapshot(&mut self) {
        let tx = match &self.snapshot_tx {
            Some(tx) => tx,
            None => return,
        };
        match tx.try_send(self.snapshot()) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => {
                debug!("Snapshot receiver gone");
                self.snapshot_tx = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::tests::RecordingActuator;
    use crate::config::GuardConfig;
    use crate::source::ReplaySource;
    use crate::stop::stop_channel;
    use crate::testing::sample_raw_frame;
    use crossbeam_channel::bounded;
    use ldlidar_data::{ZoneEvent, ZoneState};
    use std::time::Duration;

    fn obstacle_frame() -> Vec<u8> {
        let mut distances = [500; 12];
        distances[5] = 80;
        sample_raw_frame(21000, 25100, distances).to_vec()
    }

    fn pipeline(
        stream: Vec<u8>,
        config: &GuardConfig,
    ) -> Pipeline<ReplaySource, RecordingActuator> {
        Pipeline::new(
            ReplaySource::new(stream),
            config,
            RecordingActuator::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_obstacle_activates_left_zone_only() {
        let mut pipeline = pipeline(obstacle_frame(), &GuardConfig::default());

        let transitions = pipeline.run_cycle().unwrap();
        assert_eq!(
            transitions,
            vec![ZoneTransition {
                zone: 0,
                name: "left".to_string(),
                event: ZoneEvent::Activated,
            }]
        );
        let states: Vec<ZoneState> = pipeline.zones().iter().map(|z| z.state()).collect();
        assert_eq!(
            states,
            vec![ZoneState::Active, ZoneState::Inactive, ZoneState::Inactive]
        );
        assert_eq!(pipeline.actuator().calls, vec![(0, true)]);
        assert_eq!(pipeline.stats().frames, 1);

        assert!(matches!(
            pipeline.run_cycle(),
            Err(LidarError::TransportClosed)
        ));
    }

    #[test]
    fn test_transport_closed_deactivates_before_returning() {
        let mut pipeline = pipeline(obstacle_frame(), &GuardConfig::default());
        let result = pipeline.run(StopSignal::never());
        assert!(matches!(result, Err(LidarError::TransportClosed)));
        assert_eq!(pipeline.actuator().calls, vec![(0, true), (0, false)]);
        assert!(pipeline
            .zones()
            .iter()
            .all(|z| z.state() == ZoneState::Inactive));
        assert_eq!(pipeline.stats().transitions, 2);
    }

    #[test]
    fn test_recoverable_errors_are_silent() {
        let config = GuardConfig {
            verify_checksum: true,
            ..GuardConfig::default()
        };
        let mut corrupted = obstacle_frame();
        corrupted[46] ^= 0xFF;

        let mut stream = vec![0x54, 0x2D];
        stream.extend_from_slice(&corrupted);
        stream.extend_from_slice(&sample_raw_frame(21000, 25100, [500; 12]));

        let mut pipeline = pipeline(stream, &config);
        let result = pipeline.run(StopSignal::never());
        assert!(matches!(result, Err(LidarError::TransportClosed)));
        assert!(pipeline.actuator().calls.is_empty());

        let stats = pipeline.stats();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.checksum_failures, 1);
        assert_eq!(pipeline.resync_count(), 1);
    }

    #[test]
    fn test_stop_ends_run_cleanly() {
        let config = GuardConfig {
            read_timeout_ms: 20,
            ..GuardConfig::default()
        };
        let source = ReplaySource::new(obstacle_frame()).idle_when_drained();
        let mut pipeline =
            Pipeline::new(source, &config, RecordingActuator::default()).unwrap();

        let (mut handle, signal) = stop_channel();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            handle.stop();
        });
        assert!(pipeline.run(signal).is_ok());
        stopper.join().unwrap();

        assert_eq!(pipeline.stats().frames, 1);
        assert!(pipeline.stats().timeouts >= 1);
        assert_eq!(pipeline.actuator().calls, vec![(0, true), (0, false)]);
        assert_eq!(pipeline.into_source().remaining(), 0);
    }

    #[test]
    fn test_snapshots_follow_cycles() {
        let (tx, rx) = bounded(4);
        let mut stream = obstacle_frame();
        stream.extend_from_slice(&sample_raw_frame(25500, 29500, [500; 12]));
        let mut pipeline = pipeline(stream, &GuardConfig::default()).with_snapshots(tx);

        pipeline.run_cycle().unwrap();
        let snapshot = rx.try_recv().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].state, ZoneState::Active);
        assert_eq!(snapshot[0].nearest_distance, Some(80));
        assert_eq!(snapshot[2].observed_degrees, 0);

        pipeline.run_cycle().unwrap();
        let snapshot = rx.try_recv().unwrap();
        assert_eq!(snapshot[0].state, ZoneState::Active);
        assert!(snapshot[1].observed_degrees > 1);
        assert_eq!(snapshot[1].state, ZoneState::Inactive);
        assert!(snapshot[2].observed_degrees > 0);
    }
}
