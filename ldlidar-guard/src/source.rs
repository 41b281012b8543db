use crate::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::error::LidarError;
use std::collections::VecDeque;
use std::time::Duration;

/// Blocking byte reader the frame synchronizer pulls from.
///
/// `read` blocks for at most one poll interval. `Ok(0)` means nothing arrived
/// within that interval; a permanently unavailable source answers
/// `Err(LidarError::TransportClosed)`.
pub trait ByteSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LidarError>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LidarError> {
        (**self).read(buf)
    }
}

/// Replays a captured byte stream.
pub struct ReplaySource {
    data: VecDeque<u8>,
    chunk_size: usize,
    close_when_drained: bool,
    idle_interval: Duration,
}

impl ReplaySource {
    /// The source closes once every byte has been read.
    pub fn new(data: Vec<u8>) -> ReplaySource {
        ReplaySource {
            data: VecDeque::from(data),
            chunk_size: usize::MAX,
            close_when_drained: true,
            idle_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Deliver at most `chunk_size` bytes per read.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> ReplaySource {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Report an idle line instead of closing once drained. Each idle read
    /// waits one poll interval, like a serial port with nothing to deliver.
    pub fn idle_when_drained(mut self) -> ReplaySource {
        self.close_when_drained = false;
        self
    }

    pub fn with_idle_interval(mut self, idle_interval: Duration) -> ReplaySource {
        self.idle_interval = idle_interval;
        self
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.data.extend(data);
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }
}

impl ByteSource for ReplaySource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LidarError> {
        if self.data.is_empty() {
            if self.close_when_drained {
                return Err(LidarError::TransportClosed);
            }
            std::thread::sleep(self.idle_interval);
            return Ok(0);
        }
        let n = buf.len().min(self.chunk_size).min(self.data.len());
        for (dst, src) in buf.iter_mut().zip(self.data.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }
}
