use ldlidar_data::MEASUREMENTS_PER_FRAME;

pub(crate) const FRAME_HEADER: u8 = 0x54;
pub(crate) const FRAME_SIZE: usize = 47;
/// Bytes following the header and count bytes.
pub(crate) const FRAME_BODY_SIZE: usize = FRAME_SIZE - 2;
pub(crate) const EXPECTED_COUNT: u8 = MEASUREMENTS_PER_FRAME as u8;
pub(crate) const COUNT_MASK: u8 = 0x1F;
pub(crate) const PACKET_TYPE_SHIFT: u8 = 5;
/// Count bytes with a known packet type (0 or 1) and a count of 12.
pub(crate) const VALID_COUNT_BYTES: [u8; 2] =
    [EXPECTED_COUNT, (1 << PACKET_TYPE_SHIFT) | EXPECTED_COUNT];
pub(crate) const MEASUREMENT_SIZE: usize = 3;
pub(crate) const OFFSET_SPEED: usize = 2;
pub(crate) const OFFSET_START_ANGLE: usize = 4;
pub(crate) const OFFSET_MEASUREMENTS: usize = 6;
pub(crate) const OFFSET_END_ANGLE: usize = 42;
pub(crate) const OFFSET_TIMESTAMP: usize = 44;
pub(crate) const OFFSET_CHECKSUM: usize = 46;
pub(crate) const CRC8_POLYNOMIAL: u8 = 0x4D;
pub const DEFAULT_BAUD_RATE: u32 = 230400;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
pub const DEFAULT_PORT_NAME: &str = "/dev/serial0";
pub const DEFAULT_THRESHOLD_MM: u16 = 100;
