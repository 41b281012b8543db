use crate::decode::{encode, seal};
use crate::packet::RawFrame;
use ldlidar_data::{Frame, Measurement, MEASUREMENTS_PER_FRAME};

pub(crate) fn sample_frame(
    start_angle_raw: u16,
    end_angle_raw: u16,
    distances: [u16; MEASUREMENTS_PER_FRAME],
) -> Frame {
    Frame {
        header: 0x54,
        packet_type: 1,
        declared_count: 12,
        rotation_speed: 3600,
        start_angle_raw,
        measurements: distances.map(|d| Measurement::new(d, 200)),
        end_angle_raw,
        timestamp: 1000,
        checksum: 0,
    }
}

/// Encoded frame carrying a valid checksum.
pub(crate) fn sample_raw_frame(
    start_angle_raw: u16,
    end_angle_raw: u16,
    distances: [u16; MEASUREMENTS_PER_FRAME],
) -> RawFrame {
    let mut raw = encode(&sample_frame(start_angle_raw, end_angle_raw, distances));
    seal(&mut raw);
    raw
}
