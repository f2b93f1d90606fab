//! Record extraction from streamed response chunks.
//!
//! The gateway frames payload text as server-sent-event-style records:
//! `data: <payload>\n\n`. A decoded chunk may carry zero or more records.
//! A chunk without the marker is passed through whole — the named verbatim
//! fallback, so a proxy that strips or re-chunks the framing degrades to
//! plain text instead of losing data.

/// Literal marker opening each framed record.
pub const RECORD_MARKER: &str = "data: ";

/// Record terminator stripped once from the end of each framed record.
const RECORD_TERMINATOR: &str = "\n\n";

/// Splits a decoded chunk into payload records.
///
/// With at least one `data: ` marker present, the chunk is split on the
/// marker, empty segments are dropped, and one trailing `\n\n` terminator
/// is stripped per record; text before the first marker is kept as a
/// record. Without a marker the whole chunk is one verbatim record.
pub fn deframe(chunk: &str) -> Vec<&str> {
    if !chunk.contains(RECORD_MARKER) {
        return vec![chunk];
    }

    chunk
        .split(RECORD_MARKER)
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.strip_suffix(RECORD_TERMINATOR).unwrap_or(segment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record() {
        assert_eq!(deframe("data: hello\n\n"), vec!["hello"]);
    }

    #[test]
    fn test_multiple_records_in_one_chunk() {
        assert_eq!(
            deframe("data: one\n\ndata: two\n\ndata: three\n\n"),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_record_without_terminator_kept_whole() {
        assert_eq!(deframe("data: partial"), vec!["partial"]);
    }

    #[test]
    fn test_interior_newlines_preserved() {
        assert_eq!(deframe("data: a\nb\n\n"), vec!["a\nb"]);
    }

    #[test]
    fn test_terminator_stripped_only_once() {
        assert_eq!(deframe("data: x\n\n\n\n"), vec!["x\n\n"]);
    }

    #[test]
    fn test_verbatim_fallback_without_marker() {
        assert_eq!(deframe("plain chunk, no framing\n\n"), vec![
            "plain chunk, no framing\n\n"
        ]);
    }

    #[test]
    fn test_text_before_first_marker_kept() {
        assert_eq!(deframe("head data: tail\n\n"), vec!["head ", "tail"]);
    }

    #[test]
    fn test_empty_chunk_is_one_empty_record() {
        assert_eq!(deframe(""), vec![""]);
    }
}
