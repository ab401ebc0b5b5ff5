//! UTF-16 text codec for vault encryption payloads.
//!
//! Text encrypted through the vault goes over as UTF-16 with a byte order
//! mark, big-endian when none of the two byte orders is marked. Existing
//! ciphertexts were produced with this framing, so both halves honor it.

use crate::error::{CoreError, Result};

const BOM_BE: [u8; 2] = [0xfe, 0xff];
const BOM_LE: [u8; 2] = [0xff, 0xfe];

/// Encode text as UTF-16: big-endian code units behind a BOM
pub fn encode_utf16(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&BOM_BE);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Decode UTF-16 bytes back to text, honoring a leading BOM.
///
/// Without a BOM the bytes are read big-endian. Odd-length input and
/// unpaired surrogates are rejected.
pub fn decode_utf16(bytes: &[u8]) -> Result<String> {
    let (big_endian, payload) = match bytes {
        [0xfe, 0xff, rest @ ..] => (true, rest),
        [0xff, 0xfe, rest @ ..] => (false, rest),
        rest => (true, rest),
    };

    if payload.len() % 2 != 0 {
        return Err(CoreError::Validation(
            "UTF-16 payload has an odd number of bytes".to_string(),
        ));
    }

    let units = payload.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| CoreError::Validation(format!("invalid UTF-16 payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encode_prepends_big_endian_bom() {
        let bytes = encode_utf16("Hi");
        assert_eq!(bytes, vec![0xfe, 0xff, 0x00, b'H', 0x00, b'i']);
    }

    #[test]
    fn round_trip_preserves_text() {
        for text in ["", "hello", "pässwörd", "日本語", "emoji 🎉 too"] {
            assert_eq!(decode_utf16(&encode_utf16(text)).unwrap(), text);
        }
    }

    #[test]
    fn decode_honors_little_endian_bom() {
        let bytes = [0xff, 0xfe, b'H', 0x00, b'i', 0x00];
        assert_eq!(decode_utf16(&bytes).unwrap(), "Hi");
    }

    #[test]
    fn decode_without_bom_assumes_big_endian() {
        let bytes = [0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_utf16(&bytes).unwrap(), "Hi");
    }

    #[test]
    fn odd_length_is_rejected() {
        let err = decode_utf16(&[0xfe, 0xff, 0x00]).unwrap_err();
        assert!(err.to_string().contains("odd"));
    }

    #[test]
    fn unpaired_surrogate_is_rejected() {
        // 0xd800 is a lone high surrogate
        let bytes = [0xfe, 0xff, 0xd8, 0x00];
        assert!(decode_utf16(&bytes).is_err());
    }
}
