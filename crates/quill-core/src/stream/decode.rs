//! Incremental UTF-8 decoding for chunked response bodies.
//!
//! Network chunk boundaries land anywhere, including inside a multi-byte
//! sequence. The decoder holds the undecodable tail of each chunk and
//! prepends it to the next one, so a split sequence decodes exactly as the
//! unsplit original. Invalid (not merely incomplete) sequences decode to
//! U+FFFD.

use std::str;

#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Undecoded tail of the previous chunk (at most one partial sequence).
    carry: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one chunk, joining any partial sequence held from the
    /// previous call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let joined: Vec<u8>;
        let mut input: &[u8] = if self.carry.is_empty() {
            chunk
        } else {
            let mut bytes = std::mem::take(&mut self.carry);
            bytes.extend_from_slice(chunk);
            joined = bytes;
            &joined
        };

        let mut out = String::with_capacity(input.len());
        loop {
            match str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    // The prefix up to valid_up_to is valid by construction,
                    // so the lossy conversion borrows without replacement.
                    let valid = &input[..err.valid_up_to()];
                    out.push_str(&String::from_utf8_lossy(valid));

                    match err.error_len() {
                        // Incomplete sequence at the end of the input: hold
                        // it for the next chunk.
                        None => {
                            self.carry.extend_from_slice(&input[err.valid_up_to()..]);
                            // A partial sequence is at most 3 bytes.
                            debug_assert!(self.carry.len() < 4);
                            break;
                        }
                        // Invalid sequence: replace it and keep going.
                        Some(len) => {
                            out.push('\u{FFFD}');
                            input = &input[err.valid_up_to() + len..];
                        }
                    }
                }
            }
        }
        out
    }

    /// Flushes the decoder at end-of-stream.
    ///
    /// A dangling partial sequence can never complete, so it decodes to a
    /// single replacement character.
    pub fn finish(&mut self) -> Option<char> {
        if self.carry.is_empty() {
            None
        } else {
            self.carry.clear();
            Some('\u{FFFD}')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_split_two_byte_sequence() {
        let bytes = "héllo".as_bytes();
        let mut decoder = Utf8Decoder::new();
        // 'é' is two bytes starting at index 1; split inside it.
        let mut out = decoder.decode(&bytes[..2]);
        out.push_str(&decoder.decode(&bytes[2..]));
        assert_eq!(out, "héllo");
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_rechunking_is_lossless_at_every_boundary() {
        let original = "naïve 数学 🚀 done";
        let bytes = original.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = Utf8Decoder::new();
            let mut out = decoder.decode(&bytes[..split]);
            out.push_str(&decoder.decode(&bytes[split..]));
            assert_eq!(out, original, "split at byte {split}");
            assert_eq!(decoder.finish(), None);
        }
    }

    #[test]
    fn test_four_byte_sequence_in_three_chunks() {
        let bytes = "🚀".as_bytes();
        let mut decoder = Utf8Decoder::new();
        let mut out = decoder.decode(&bytes[..1]);
        out.push_str(&decoder.decode(&bytes[1..3]));
        out.push_str(&decoder.decode(&bytes[3..]));
        assert_eq!(out, "🚀");
    }

    #[test]
    fn test_invalid_byte_becomes_replacement() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_dangling_partial_flushes_as_replacement() {
        let bytes = "é".as_bytes();
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert_eq!(decoder.finish(), Some('\u{FFFD}'));
        // The carry is consumed by the flush.
        assert_eq!(decoder.finish(), None);
    }
}
