use crossbeam_channel::{bounded, never, Receiver, Sender, TryRecvError};

/// Sending half of a stop signal. Dropping the handle raises the signal.
pub struct StopHandle {
    tx: Option<Sender<()>>,
}

/// Receiving half of a stop signal.
///
/// Once raised the signal stays raised for every clone, because raising it
/// disconnects the underlying channel.
#[derive(Clone)]
pub struct StopSignal {
    rx: Receiver<()>,
}

pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = bounded(1);
    (StopHandle { tx: Some(tx) }, StopSignal { rx })
}

impl StopHandle {
    pub fn stop(&mut self) {
        self.tx.take();
    }
}

impl StopSignal {
    /// A signal that is never raised.
    pub fn never() -> StopSignal {
        StopSignal { rx: never() }
    }

    pub fn is_raised(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }
}
