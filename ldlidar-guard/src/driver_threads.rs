use crate::actuator::ActuatorDriver;
use crate::error::LidarError;
use crate::pipeline::Pipeline;
use crate::source::ByteSource;
use crate::stop::{stop_channel, StopHandle};
use crossbeam_channel::{bounded, Receiver};
use ldlidar_data::ZoneSnapshot;
use std::thread::JoinHandle;

const SNAPSHOT_QUEUE_SIZE: usize = 10;

/// Handle to a guard running on its own thread.
/// Dropping it stops the guard and waits for the shutdown sequence.
pub struct GuardThread {
    pub(crate) stop: StopHandle,
    pub(crate) thread: Option<JoinHandle<Result<(), LidarError>>>,
}

impl GuardThread {
    /// Asks the guard to stop without waiting for it.
    pub fn stop(&mut self) {
        self.stop.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Stops the guard and returns how its run loop ended.
    pub fn join(mut self) -> Result<(), LidarError> {
        join(&mut self)
    }
}

fn join_thread(guard_thread: &mut GuardThread) -> std::thread::Result<Result<(), LidarError>> {
    guard_thread.stop();
    match guard_thread.thread.take() {
        Some(thread) => thread.join(),
        None => Ok(Ok(())),
    }
}

/// Function to join the guard thread.
/// A panic on the guard thread is re-raised on the caller.
pub fn join(guard_thread: &mut GuardThread) -> Result<(), LidarError> {
    match join_thread(guard_thread) {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

impl Drop for GuardThread {
    fn drop(&mut self) {
        match join_thread(self) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("Guard ended with error: {}", e),
            Err(_) => log::error!("Guard thread panicked"),
        }
    }
}

/// Runs `pipeline` on a new thread.
///
/// Returns the thread handle and a receiver of per-cycle zone snapshots.
pub fn spawn_guard<S, A>(pipeline: Pipeline<S, A>) -> (GuardThread, Receiver<Vec<ZoneSnapshot>>)
where
    S: ByteSource + Send + 'static,
    A: ActuatorDriver + Send + 'static,
{
    let (stop, stop_signal) = stop_channel();
    let (snapshot_tx, snapshot_rx) = bounded(SNAPSHOT_QUEUE_SIZE);
    let mut pipeline = pipeline.with_snapshots(snapshot_tx);

    let thread = Some(std::thread::spawn(move || pipeline.run(stop_signal)));

    (GuardThread { stop, thread }, snapshot_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::ChannelActuator;
    use crate::config::GuardConfig;
    use crate::source::ReplaySource;
    use crate::testing::sample_raw_frame;
    use crossbeam_channel::unbounded;
    use ldlidar_data::ZoneState;
    use std::time::Duration;

    #[test]
    fn test_spawn_and_drop() {
        let mut distances = [500; 12];
        distances[0] = 50;
        let frame = sample_raw_frame(29500, 33500, distances);
        let source = ReplaySource::new(frame.to_vec()).idle_when_drained();

        let (tx, rx) = unbounded();
        let pipeline =
            Pipeline::new(source, &GuardConfig::default(), ChannelActuator::new(tx)).unwrap();
        let (guard, snapshots) = spawn_guard(pipeline);

        let snapshot = snapshots.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(snapshot[2].state, ZoneState::Active);
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), (2, true));

        drop(guard);
        assert_eq!(rx.try_recv().unwrap(), (2, false));
    }

    #[test]
    fn test_join_reports_fatal_error() {
        let source = ReplaySource::new(Vec::new());
        let (tx, _rx) = unbounded();
        let pipeline =
            Pipeline::new(source, &GuardConfig::default(), ChannelActuator::new(tx)).unwrap();
        let (guard, snapshots) = spawn_guard(pipeline);
        // The shutdown sequence publishes a final snapshot
        let snapshot = snapshots.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(snapshot.iter().all(|z| z.state == ZoneState::Inactive));
        assert!(matches!(guard.join(), Err(LidarError::TransportClosed)));
    }

    #[test]
    fn test_is_finished_after_fatal_error() {
        let source = ReplaySource::new(Vec::new());
        let (tx, _rx) = unbounded();
        let pipeline =
            Pipeline::new(source, &GuardConfig::default(), ChannelActuator::new(tx)).unwrap();
        let (guard, _snapshots) = spawn_guard(pipeline);

        let start = std::time::Instant::now();
        while !guard.is_finished() && start.elapsed() < Duration::from_secs(1) {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(guard.is_finished());
    }

    struct PanickingSource;

    impl ByteSource for PanickingSource {
        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, LidarError> {
            panic!("source failure");
        }
    }

    #[test]
    fn test_drop_survives_guard_panic() {
        let (tx, _rx) = unbounded();
        let pipeline = Pipeline::new(
            PanickingSource,
            &GuardConfig::default(),
            ChannelActuator::new(tx),
        )
        .unwrap();
        let (guard, _snapshots) = spawn_guard(pipeline);
        // Dropping while the caller is itself unwinding must not abort.
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = guard;
            panic!("owner failure");
        }));
        assert!(result.is_err());
    }
}
