//! Domain-name wire codec with RFC 1035 name compression.
//!
//! Names travel as length-prefixed labels terminated by a zero byte; a byte
//! with both top bits set is a 2-byte pointer to an earlier occurrence in the
//! same message. In memory a name is a dot-separated ASCII string with no
//! trailing dot.

use rustc_hash::FxHashMap;

use crate::error::DnsError;

/// Maximum length of a single label on the wire.
pub const MAX_LABEL_LEN: usize = 63;
/// Maximum length of a full domain name.
pub const MAX_NAME_LEN: usize = 255;
/// Pointer chains longer than this are rejected as loops.
const MAX_POINTER_HOPS: u32 = 20;
/// Top two bits of a length byte mark a compression pointer.
const COMPRESSION_MASK: u8 = 0xC0;

/// Suffix-to-offset map driving compression on encode.
///
/// Keys are textual name suffixes ("ads.example.com", "example.com", "com"),
/// values are absolute offsets into the datagram being built. One table lives
/// for exactly one message encode.
pub type CompressionTable = FxHashMap<String, u16>;

/// Decode a name starting at `*cursor`.
///
/// On success `cursor` is left just past the terminating zero byte, or past
/// the 2-byte pointer when the name was compressed at the caller's position.
/// A lone zero byte decodes to the empty string.
pub fn decode_name(buf: &[u8], cursor: &mut usize) -> Result<String, DnsError> {
    let mut name = String::new();
    let mut pos = *cursor;
    let mut jumped = false;
    let mut hops = 0u32;

    loop {
        if pos >= buf.len() {
            return Err(DnsError::Truncated);
        }
        let len_byte = buf[pos];

        // end of name
        if len_byte == 0 {
            if !jumped {
                *cursor = pos + 1;
            }
            return Ok(name);
        }

        if len_byte & COMPRESSION_MASK == COMPRESSION_MASK {
            if pos + 1 >= buf.len() {
                return Err(DnsError::PtrOob);
            }
            let target = (((len_byte & 0x3F) as usize) << 8) | buf[pos + 1] as usize;
            if target >= buf.len() {
                return Err(DnsError::PtrOob);
            }
            // only the first pointer decides where the caller resumes
            if !jumped {
                *cursor = pos + 2;
            }
            jumped = true;
            pos = target;
            hops += 1;
            if hops > MAX_POINTER_HOPS {
                return Err(DnsError::PtrLoop);
            }
            continue;
        }

        let len = len_byte as usize;
        if len > MAX_LABEL_LEN {
            return Err(DnsError::BadLabel);
        }
        pos += 1;
        if pos + len > buf.len() {
            return Err(DnsError::Truncated);
        }
        let label = std::str::from_utf8(&buf[pos..pos + len]).map_err(|_| DnsError::BadLabel)?;
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(label);
        pos += len;

        if name.len() > MAX_NAME_LEN {
            return Err(DnsError::NameTooLong);
        }
    }
}

/// Encode a name, optionally compressing against `table`.
///
/// Each suffix of the name is looked up in the table; a hit emits a 2-byte
/// pointer and ends the encoding. A miss registers the suffix at
/// `base_offset + bytes_written_so_far` before its first label is written, so
/// later names in the same message can point back at it. Passing `None`
/// disables compression entirely.
pub fn encode_name(
    name: &str,
    mut table: Option<&mut CompressionTable>,
    base_offset: u16,
) -> Result<Vec<u8>, DnsError> {
    let mut buf = Vec::with_capacity(name.len() + 2);
    let mut pos = 0usize;

    loop {
        let remaining = &name[pos..];

        if let Some(table) = table.as_deref_mut() {
            if let Some(&offset) = table.get(remaining) {
                buf.push(COMPRESSION_MASK | ((offset >> 8) as u8 & 0x3F));
                buf.push(offset as u8);
                return Ok(buf);
            }
            // register before writing, so identical later suffixes compress
            table.insert(remaining.to_owned(), base_offset + buf.len() as u16);
        }

        if pos >= name.len() {
            buf.push(0);
            break;
        }

        let label_end = name[pos..].find('.').map_or(name.len(), |dot| pos + dot);
        let label_len = label_end - pos;
        if label_len == 0 || label_len > MAX_LABEL_LEN {
            return Err(DnsError::LabelTooLong);
        }
        buf.push(label_len as u8);
        buf.extend_from_slice(name[pos..label_end].as_bytes());
        pos = if label_end == name.len() { label_end } else { label_end + 1 };
    }

    if buf.len() > MAX_NAME_LEN {
        return Err(DnsError::EncodeNameTooLong);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(labels: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        for label in labels {
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
        buf.push(0);
        buf
    }

    #[test]
    fn decodes_plain_labels() {
        let buf = wire(&["www", "example", "com"]);
        let mut cursor = 0;

        let name = decode_name(&buf, &mut cursor).unwrap();

        assert_eq!(name, "www.example.com");
        assert_eq!(cursor, buf.len());
    }

    #[test]
    fn decodes_empty_name() {
        let buf = [0u8];
        let mut cursor = 0;

        let name = decode_name(&buf, &mut cursor).unwrap();

        assert_eq!(name, "");
        assert_eq!(cursor, 1);
    }

    #[test]
    fn follows_pointer_and_resumes_after_it() {
        // "example.com" at offset 0, then "www" + pointer to offset 0
        let mut buf = wire(&["example", "com"]);
        let ptr_start = buf.len();
        buf.push(3);
        buf.extend_from_slice(b"www");
        buf.push(0xC0);
        buf.push(0x00);

        let mut cursor = ptr_start;
        let name = decode_name(&buf, &mut cursor).unwrap();

        assert_eq!(name, "www.example.com");
        assert_eq!(cursor, buf.len());
    }

    #[test]
    fn rejects_self_pointer_as_loop() {
        // pointer at offset 0 targeting offset 0
        let buf = [0xC0, 0x00];
        let mut cursor = 0;

        assert_eq!(decode_name(&buf, &mut cursor), Err(DnsError::PtrLoop));
    }

    #[test]
    fn rejects_pointer_past_buffer() {
        let buf = [0xC0, 0x10];
        let mut cursor = 0;

        assert_eq!(decode_name(&buf, &mut cursor), Err(DnsError::PtrOob));
    }

    #[test]
    fn rejects_pointer_missing_second_byte() {
        let buf = [0xC0];
        let mut cursor = 0;

        assert_eq!(decode_name(&buf, &mut cursor), Err(DnsError::PtrOob));
    }

    #[test]
    fn rejects_oversized_label() {
        // 64 is above the label limit but below the pointer mask
        let mut buf = vec![64u8];
        buf.extend_from_slice(&[b'a'; 64]);
        buf.push(0);
        let mut cursor = 0;

        assert_eq!(decode_name(&buf, &mut cursor), Err(DnsError::BadLabel));
    }

    #[test]
    fn rejects_label_overrunning_buffer() {
        let buf = [5u8, b'a', b'b'];
        let mut cursor = 0;

        assert_eq!(decode_name(&buf, &mut cursor), Err(DnsError::Truncated));
    }

    #[test]
    fn rejects_missing_terminator() {
        let buf = [3u8, b'w', b'w', b'w'];
        let mut cursor = 0;

        assert_eq!(decode_name(&buf, &mut cursor), Err(DnsError::Truncated));
    }

    #[test]
    fn rejects_name_over_255_bytes() {
        let label = "a".repeat(63);
        let parts = [label.as_str(); 5];
        let buf = wire(&parts);
        let mut cursor = 0;

        assert_eq!(decode_name(&buf, &mut cursor), Err(DnsError::NameTooLong));
    }

    #[test]
    fn encodes_plain_labels() {
        let bytes = encode_name("www.example.com", None, 0).unwrap();

        assert_eq!(bytes, wire(&["www", "example", "com"]));
    }

    #[test]
    fn encodes_empty_name_as_root() {
        let bytes = encode_name("", None, 0).unwrap();

        assert_eq!(bytes, vec![0]);
    }

    #[test]
    fn encode_decode_round_trip() {
        let bytes = encode_name("sub.ads.example.com", None, 0).unwrap();
        let mut cursor = 0;

        assert_eq!(decode_name(&bytes, &mut cursor).unwrap(), "sub.ads.example.com");
    }

    #[test]
    fn rejects_empty_label_on_encode() {
        assert_eq!(encode_name("a..b", None, 0), Err(DnsError::LabelTooLong));
    }

    #[test]
    fn rejects_oversized_label_on_encode() {
        let name = "a".repeat(64);

        assert_eq!(encode_name(&name, None, 0), Err(DnsError::LabelTooLong));
    }

    #[test]
    fn rejects_oversized_name_on_encode() {
        let name = vec!["a".repeat(63); 5].join(".");

        assert_eq!(encode_name(&name, None, 0), Err(DnsError::EncodeNameTooLong));
    }

    #[test]
    fn second_occurrence_becomes_pointer() {
        let mut table = CompressionTable::default();
        let first = encode_name("a.example.com", Some(&mut table), 12).unwrap();
        let second =
            encode_name("a.example.com", Some(&mut table), 12 + first.len() as u16).unwrap();

        assert_eq!(second, vec![0xC0, 12]);
    }

    #[test]
    fn shared_suffix_compresses_tail() {
        let mut table = CompressionTable::default();
        let first = encode_name("a.example.com", Some(&mut table), 12).unwrap();
        let second =
            encode_name("b.example.com", Some(&mut table), 12 + first.len() as u16).unwrap();

        // "b" label plus a pointer at the "example.com" suffix
        assert_eq!(second, vec![1, b'b', 0xC0, 14]);
    }

    #[test]
    fn compression_never_enlarges_encoding() {
        let names = ["a.example.com", "b.example.com", "c.a.example.com", "example.com"];
        let mut table = CompressionTable::default();
        let mut offset = 12u16;

        for name in names {
            let compressed = encode_name(name, Some(&mut table), offset).unwrap();
            let plain = encode_name(name, None, 0).unwrap();
            assert!(compressed.len() <= plain.len());
            offset += compressed.len() as u16;
        }
    }
}
