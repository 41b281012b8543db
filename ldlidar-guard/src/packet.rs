use crate::constants::{FRAME_BODY_SIZE, FRAME_HEADER, FRAME_SIZE, VALID_COUNT_BYTES};
use crate::error::LidarError;
use crate::numeric::to_string;
use crate::source::ByteSource;
use crate::stop::StopSignal;
use log::debug;
use std::time::{Duration, Instant};

/// Undecoded bytes of one frame, header included.
pub type RawFrame = [u8; FRAME_SIZE];

pub(crate) fn is_valid_count(count_byte: u8) -> bool {
    VALID_COUNT_BYTES.contains(&count_byte)
}

/// Locates frame boundaries in a byte stream.
pub struct FrameSynchronizer<S> {
    source: S,
    read_timeout: Duration,
    stop: StopSignal,
    resyncs: u64,
}

impl<S: ByteSource> FrameSynchronizer<S> {
    /// # Arguments
    ///
    /// * `source` - Transport to read from.
    /// * `read_timeout` - Deadline for one complete frame, header search included.
    pub fn new(source: S, read_timeout: Duration) -> FrameSynchronizer<S> {
        FrameSynchronizer {
            source,
            read_timeout,
            stop: StopSignal::never(),
            resyncs: 0,
        }
    }

    pub fn with_stop(mut self, stop: StopSignal) -> FrameSynchronizer<S> {
        self.stop = stop;
        self
    }

    pub fn set_stop(&mut self, stop: StopSignal) {
        self.stop = stop;
    }

    /// Number of candidate headers discarded because of a bad count byte.
    pub fn resync_count(&self) -> u64 {
        self.resyncs
    }

    /// Releases the transport.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Scans for the next header/count pair and reads the rest of the frame.
    pub fn sync_and_read_frame(&mut self) -> Result<RawFrame, LidarError> {
        let deadline = Instant::now() + self.read_timeout;
        let mut byte = self.read_byte(deadline)?;
        loop {
            if byte != FRAME_HEADER {
                byte = self.read_byte(deadline)?;
                continue;
            }
            let count_byte = self.read_byte(deadline)?;
            if !is_valid_count(count_byte) {
                self.resyncs += 1;
                debug!(
                    "Discarding frame candidate, count byte = {:#04X}",
                    count_byte
                );
                // The rejected count byte may itself be the next header.
                byte = count_byte;
                continue;
            }

            let mut frame: RawFrame = [0; FRAME_SIZE];
            frame[0] = byte;
            frame[1] = count_byte;
            self.read_body(&mut frame[2..], deadline)?;
            return Ok(frame);
        }
    }

    fn check_interrupts(&self, deadline: Instant) -> Result<(), LidarError> {
        if self.stop.is_raised() {
            return Err(LidarError::Cancelled);
        }
        if Instant::now() >= deadline {
            return Err(LidarError::SyncTimeout);
        }
        Ok(())
    }

    fn read_byte(&mut self, deadline: Instant) -> Result<u8, LidarError> {
        let mut buf = [0u8; 1];
        loop {
            self.check_interrupts(deadline)?;
            if self.source.read(&mut buf)? == 1 {
                return Ok(buf[0]);
            }
        }
    }

    fn read_body(&mut self, body: &mut [u8], deadline: Instant) -> Result<(), LidarError> {
        debug_assert_eq!(body.len(), FRAME_BODY_SIZE);
        let mut filled = 0;
        while filled < body.len() {
            self.check_interrupts(deadline)?;
            let n = self.source.read(&mut body[filled..])?;
            if n == 0 {
                return Err(LidarError::MalformedFrame(format!(
                    "frame body ended after {} of {} bytes [{}]",
                    filled,
                    body.len(),
                    to_string(&body[..filled])
                )));
            }
            filled += n;
        }
        Ok(())
    }
}
