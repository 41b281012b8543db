use crate::constants::{
    COUNT_MASK, FRAME_SIZE, MEASUREMENT_SIZE, OFFSET_CHECKSUM, OFFSET_END_ANGLE,
    OFFSET_MEASUREMENTS, OFFSET_SPEED, OFFSET_START_ANGLE, OFFSET_TIMESTAMP, PACKET_TYPE_SHIFT,
};
use crate::error::LidarError;
use crate::numeric::{crc8, le_u16, put_le_u16};
use crate::packet::RawFrame;
use ldlidar_data::{Frame, Measurement};

fn measurement_index(idx: usize) -> usize {
    OFFSET_MEASUREMENTS + idx * MEASUREMENT_SIZE
}

/// Interprets the fields of a raw frame. Never fails; validation of the
/// header and count byte happens while synchronizing.
pub fn decode(raw: &RawFrame) -> Frame {
    let measurements = std::array::from_fn(|idx| {
        let i = measurement_index(idx);
        Measurement {
            distance: le_u16(raw, i),
            intensity: raw[i + 2],
        }
    });
    Frame {
        header: raw[0],
        packet_type: raw[1] >> PACKET_TYPE_SHIFT,
        declared_count: raw[1] & COUNT_MASK,
        rotation_speed: le_u16(raw, OFFSET_SPEED),
        start_angle_raw: le_u16(raw, OFFSET_START_ANGLE),
        measurements,
        end_angle_raw: le_u16(raw, OFFSET_END_ANGLE),
        timestamp: le_u16(raw, OFFSET_TIMESTAMP),
        checksum: raw[OFFSET_CHECKSUM],
    }
}

/// Inverse of [`decode`]. The stored checksum is written as is.
pub fn encode(frame: &Frame) -> RawFrame {
    let mut raw: RawFrame = [0; FRAME_SIZE];
    raw[0] = frame.header;
    raw[1] = (frame.packet_type << PACKET_TYPE_SHIFT) | (frame.declared_count & COUNT_MASK);
    put_le_u16(&mut raw, OFFSET_SPEED, frame.rotation_speed);
    put_le_u16(&mut raw, OFFSET_START_ANGLE, frame.start_angle_raw);
    for (idx, m) in frame.measurements.iter().enumerate() {
        let i = measurement_index(idx);
        put_le_u16(&mut raw, i, m.distance);
        raw[i + 2] = m.intensity;
    }
    put_le_u16(&mut raw, OFFSET_END_ANGLE, frame.end_angle_raw);
    put_le_u16(&mut raw, OFFSET_TIMESTAMP, frame.timestamp);
    raw[OFFSET_CHECKSUM] = frame.checksum;
    raw
}

/// CRC-8 over every byte preceding the checksum field.
pub fn calc_checksum(raw: &RawFrame) -> u8 {
    crc8(&raw[..OFFSET_CHECKSUM])
}

/// Overwrites the checksum field with the value computed from the frame.
pub fn seal(raw: &mut RawFrame) {
    raw[OFFSET_CHECKSUM] = calc_checksum(raw);
}

pub(crate) fn err_if_checksum_mismatched(raw: &RawFrame) -> Result<(), LidarError> {
    let calculated = calc_checksum(raw);
    let expected = raw[OFFSET_CHECKSUM];
    match calculated != expected {
        true => Err(LidarError::ChecksumMismatch {
            expected,
            calculated,
        }),
        false => Ok(()),
    }
}

/// Frame decoder with optional checksum enforcement.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameDecoder {
    verify_checksum: bool,
}

impl FrameDecoder {
    pub fn new(verify_checksum: bool) -> FrameDecoder {
        FrameDecoder { verify_checksum }
    }

    pub fn verifies_checksum(&self) -> bool {
        self.verify_checksum
    }

    pub fn decode(&self, raw: &RawFrame) -> Result<Frame, LidarError> {
        if self.verify_checksum {
            err_if_checksum_mismatched(raw)?;
        }
        Ok(decode(raw))
    }
}
