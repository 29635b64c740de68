//! Minimal UTF-8 code-point codec shared by the parser and the renderer.
//!
//! The parser uses it to turn `\u` escapes back into bytes, the renderer to
//! turn multi-byte sequences back into `\uXXXX` escapes. Both directions work
//! on raw `u32` code points so surrogate handling stays in the callers.

/// Number of bytes needed to encode `u`, or 0 when `u` is above U+10FFFF.
pub const fn encoded_len(u: u32) -> usize {
    match u {
        0..=0x7f => 1,
        0x80..=0x7ff => 2,
        0x800..=0xffff => 3,
        0x1_0000..=0x10_ffff => 4,
        _ => 0,
    }
}

/// Number of bytes of the sequence starting at `byte`, or 0 when `byte` is a
/// continuation byte.
pub const fn decoded_len(byte: u8) -> usize {
    if byte & 0xc0 == 0x80 {
        0
    } else if byte & 0xf8 == 0xf0 {
        4
    } else if byte & 0xf0 == 0xe0 {
        3
    } else if byte & 0xe0 == 0xc0 {
        2
    } else {
        1
    }
}

/// Decodes the code point starting at `bytes[0]`.
///
/// Returns `None` on a continuation byte, a truncated sequence, or an invalid
/// leading byte.
pub fn decode(bytes: &[u8]) -> Option<u32> {
    let first = *bytes.first()?;
    if first <= 0x7f {
        return Some(u32::from(first));
    }

    let (mut res, rest) = match decoded_len(first) {
        2 => (u32::from(first & 0x1f), 1),
        3 => (u32::from(first & 0x0f), 2),
        4 => (u32::from(first & 0x07), 3),
        _ => return None,
    };
    if bytes.len() <= rest {
        return None;
    }

    for &b in &bytes[1..=rest] {
        // Continuation bytes must look like 10xxxxxx.
        if b & 0xc0 != 0x80 {
            return None;
        }
        res = (res << 6) | u32::from(b & 0x3f);
    }
    Some(res)
}

/// Encodes `u` into `out`, returning the number of bytes written (0 when `u`
/// is not encodable).
pub fn encode(out: &mut [u8; 4], u: u32) -> usize {
    match encoded_len(u) {
        1 => {
            out[0] = u as u8;
            1
        }
        2 => {
            out[0] = 0xc0 | ((u >> 6) & 0x1f) as u8;
            out[1] = 0x80 | (u & 0x3f) as u8;
            2
        }
        3 => {
            out[0] = 0xe0 | ((u >> 12) & 0x0f) as u8;
            out[1] = 0x80 | ((u >> 6) & 0x3f) as u8;
            out[2] = 0x80 | (u & 0x3f) as u8;
            3
        }
        4 => {
            out[0] = 0xf0 | ((u >> 18) & 0x07) as u8;
            out[1] = 0x80 | ((u >> 12) & 0x3f) as u8;
            out[2] = 0x80 | ((u >> 6) & 0x3f) as u8;
            out[3] = 0x80 | (u & 0x3f) as u8;
            4
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_len_boundaries() {
        assert_eq!(encoded_len(0), 1);
        assert_eq!(encoded_len(0x7f), 1);
        assert_eq!(encoded_len(0x80), 2);
        assert_eq!(encoded_len(0x7ff), 2);
        assert_eq!(encoded_len(0x800), 3);
        assert_eq!(encoded_len(0xffff), 3);
        assert_eq!(encoded_len(0x1_0000), 4);
        assert_eq!(encoded_len(0x10_ffff), 4);
        assert_eq!(encoded_len(0x11_0000), 0);
    }

    #[test]
    fn decoded_len_matches_leading_byte() {
        assert_eq!(decoded_len(b'a'), 1);
        assert_eq!(decoded_len(0xc3), 2);
        assert_eq!(decoded_len(0xe6), 3);
        assert_eq!(decoded_len(0xf0), 4);
        assert_eq!(decoded_len(0x80), 0);
    }

    #[test]
    fn encode_matches_std() {
        for &c in &['a', 'é', '日', '😀'] {
            let mut out = [0u8; 4];
            let n = encode(&mut out, c as u32);
            let mut std_buf = [0u8; 4];
            assert_eq!(&out[..n], c.encode_utf8(&mut std_buf).as_bytes());
        }
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0x80]), None);
        assert_eq!(decode(&[0xe6, 0x97]), None);
        assert_eq!(decode(&[0xe6, 0x41, 0x41]), None);
    }

    #[test]
    fn codec_inverse_over_all_scalars() {
        let mut buf = [0u8; 4];
        for u in 0..=0x10_ffffu32 {
            if (0xd800..=0xdfff).contains(&u) {
                continue;
            }
            let n = encode(&mut buf, u);
            assert!(n > 0);
            assert_eq!(decode(&buf[..n]), Some(u), "code point {u:#x}");
        }
    }
}
