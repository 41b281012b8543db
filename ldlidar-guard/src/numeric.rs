use crate::constants::CRC8_POLYNOMIAL;

const CRC8_TABLE: [u8; 256] = build_crc8_table();

const fn build_crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

pub(crate) fn crc8(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |crc, b| CRC8_TABLE[(crc ^ b) as usize])
}

/// Little-endian u16 starting at `offset`.
pub(crate) fn le_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn put_le_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn normalize_degree(degree: f64) -> f64 {
    let d = degree.rem_euclid(360.);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360. {
        0.
    } else {
        d
    }
}

/// Inclusive range test. A range with `start > end` wraps through 0 degrees.
pub(crate) fn angle_in_range(angle: f64, start: f64, end: f64) -> bool {
    if start <= end {
        start <= angle && angle <= end
    } else {
        angle >= start || angle <= end
    }
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_table() {
        assert_eq!(CRC8_TABLE[0], 0x00);
        assert_eq!(CRC8_TABLE[1], 0x4D);
        assert_eq!(CRC8_TABLE[2], 0x9A);
        assert_eq!(CRC8_TABLE[3], 0xD7);
        assert_eq!(CRC8_TABLE[0x4D], 0xF8);
    }

    #[test]
    fn test_crc8() {
        assert_eq!(crc8(&[]), 0x00);
        assert_eq!(crc8(&[0x01]), 0x4D);
        // 0x01 -> 0x4D, then 0x4D ^ 0x00 indexes the table again
        assert_eq!(crc8(&[0x01, 0x00]), 0xF8);
    }

    #[test]
    fn test_le_u16() {
        let bytes = [0x54, 0x2C, 0x68, 0x08];
        assert_eq!(le_u16(&bytes, 2), 0x0868);

        let mut out = [0u8; 4];
        put_le_u16(&mut out, 1, 0xABCD);
        assert_eq!(out, [0x00, 0xCD, 0xAB, 0x00]);
    }

    #[test]
    fn test_normalize_degree() {
        assert_eq!(normalize_degree(370.), 10.);
        assert_eq!(normalize_degree(360.), 0.);
        assert_eq!(normalize_degree(-10.), 350.);
        assert_eq!(normalize_degree(123.5), 123.5);
    }

    #[test]
    fn test_angle_in_range() {
        assert!(angle_in_range(210., 210., 250.));
        assert!(angle_in_range(250., 210., 250.));
        assert!(!angle_in_range(250.01, 210., 250.));
        assert!(!angle_in_range(209.99, 210., 250.));

        assert!(angle_in_range(355., 350., 10.));
        assert!(angle_in_range(0., 350., 10.));
        assert!(angle_in_range(10., 350., 10.));
        assert!(!angle_in_range(180., 350., 10.));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&[0x54, 0x0D]), "54 0D");
    }
}
