/// Little-endian byte and bit extraction over raw image data
///
/// Every reader returns `None` when the requested bytes run past the end of
/// the buffer, so corrupt offsets never panic.

/// Read an unsigned little-endian integer of 1 to 4 bytes
#[inline]
pub fn read_uint(data: &[u8], offset: usize, size: usize) -> Option<u32> {
    if size == 0 || size > 4 {
        return None;
    }
    let bytes = data.get(offset..offset.checked_add(size)?)?;
    Some(
        bytes
            .iter()
            .enumerate()
            .fold(0u32, |n, (i, &b)| n | (u32::from(b) << (i * 8))),
    )
}

/// Read a signed little-endian integer of 1 to 4 bytes
#[inline]
pub fn read_int(data: &[u8], offset: usize, size: usize) -> Option<i32> {
    let value = read_uint(data, offset, size)?;
    let shift = 32 - (size as u32 * 8);
    // Sign-extend from the top bit of the field
    Some(((value << shift) as i32) >> shift)
}

/// Read a single byte
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Option<u8> {
    data.get(offset).copied()
}

/// Read a little-endian half word
#[inline]
pub fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    read_uint(data, offset, 2).map(|n| n as u16)
}

/// Read a 3-byte little-endian value, as used for disc addresses and SINs
#[inline]
pub fn read_u24(data: &[u8], offset: usize) -> Option<u32> {
    read_uint(data, offset, 3)
}

/// Read a little-endian word
#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    read_uint(data, offset, 4)
}

/// Extract `width` bits of `value` starting at bit `shift`
#[inline]
pub fn bit_run(value: u32, shift: u32, width: u32) -> u32 {
    let mask = if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    };
    value.checked_shr(shift).unwrap_or(0) & mask
}

/// Convert a raw catalogue string into a printable name
///
/// Reading stops at the first control character (or space, unless
/// `with_space` is set). Characters with the top bit set have it cleared;
/// ADFS uses those bits as attribute flags inside names. A cleared character
/// that is a space or control code is dropped.
pub fn safe_name(raw: &[u8], with_space: bool) -> String {
    let lower = if with_space { 31 } else { 32 };
    let mut name = String::with_capacity(raw.len());

    for &b in raw {
        if b <= lower {
            break;
        }
        if b >= 0x80 {
            let c = b ^ 0x80;
            if c > 32 {
                name.push(char::from(c));
            }
        } else {
            name.push(char::from(b));
        }
    }

    name
}

/// 1-based index of the last byte in `raw` with its top bit set, or 0
pub fn last_top_bit(raw: &[u8]) -> usize {
    raw.iter()
        .rposition(|&b| b & 0x80 != 0)
        .map(|i| i + 1)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_uint_sizes() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        assert_eq!(read_u8(&data, 0), Some(0x01));
        assert_eq!(read_u16(&data, 0), Some(0x0201));
        assert_eq!(read_u24(&data, 1), Some(0x040302));
        assert_eq!(read_u32(&data, 1), Some(0x05040302));
    }

    #[test]
    fn test_read_past_end() {
        let data = [0xFF, 0xFF];
        assert_eq!(read_u16(&data, 1), None);
        assert_eq!(read_u32(&data, 0), None);
        assert_eq!(read_u8(&data, 2), None);
        assert_eq!(read_uint(&data, usize::MAX, 2), None);
    }

    #[test]
    fn test_read_signed() {
        let data = [0xFF, 0xFF, 0x80, 0x00];
        assert_eq!(read_int(&data, 0, 1), Some(-1));
        assert_eq!(read_int(&data, 0, 2), Some(-1));
        assert_eq!(read_int(&data, 1, 2), Some(-32513));
        assert_eq!(read_int(&data, 2, 1), Some(-128));
        assert_eq!(read_int(&data, 2, 2), Some(0x80));
        assert_eq!(read_int(&data, 0, 4), Some(0x0080FFFF));
    }

    #[test]
    fn test_bit_run() {
        assert_eq!(bit_run(0x8123, 0, 15), 0x0123);
        assert_eq!(bit_run(0x8123, 15, 1), 1);
        assert_eq!(bit_run(0x012345, 8, 16), 0x0123);
        assert_eq!(bit_run(0xFFFF_FFFF, 0, 32), 0xFFFF_FFFF);
        assert_eq!(bit_run(0xFFFF_FFFF, 40, 4), 0);
    }

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name(b"HELLO\r    ", false), "HELLO");
        assert_eq!(safe_name(b"MY DISC\0\0\0", true), "MY DISC");
        assert_eq!(safe_name(b"MY DISC\0\0\0", false), "MY");
        // Attribute bits in the top of each character
        assert_eq!(safe_name(&[b'A' | 0x80, b'B', b'C' | 0x80, 0x0D], false), "ABC");
        // Top-bit space is dropped rather than terminating
        assert_eq!(safe_name(&[b'A', 0xA0, b'B'], false), "AB");
    }

    #[test]
    fn test_last_top_bit() {
        assert_eq!(last_top_bit(b"PLAIN"), 0);
        assert_eq!(last_top_bit(&[b'A' | 0x80, b'B', b'C' | 0x80, b'D']), 3);
    }

    proptest! {
        #[test]
        fn prop_read_uint_matches_from_le_bytes(bytes in proptest::array::uniform4(any::<u8>())) {
            prop_assert_eq!(read_u32(&bytes, 0), Some(u32::from_le_bytes(bytes)));
            prop_assert_eq!(read_u16(&bytes, 2), Some(u16::from_le_bytes([bytes[2], bytes[3]])));
            prop_assert_eq!(read_int(&bytes, 0, 2), Some(i16::from_le_bytes([bytes[0], bytes[1]]) as i32));
        }

        #[test]
        fn prop_safe_name_is_printable(raw in proptest::collection::vec(any::<u8>(), 0..16)) {
            let name = safe_name(&raw, true);
            prop_assert!(name.chars().all(|c| c.is_ascii() && c >= ' '));
            prop_assert!(name.len() <= raw.len());
        }
    }
}
