//! Safe-to-render window over a streaming buffer.
//!
//! Mid-stream, the buffer may end inside a `$...$` or `$$...$$` math span;
//! handing that to the markdown renderer flashes a broken formula. The
//! window is the longest prefix with no unterminated math delimiter. Once
//! the exchange settles (Complete or Failed) the buffer renders verbatim:
//! a malformed delimiter in final content is the author's, not ours to
//! hide.
//!
//! Code fences are NOT safety-checked here; a streaming code block may
//! render with transient glitches until its closing fence arrives.

use std::borrow::Cow;

use quill_core::stream::StreamState;

/// Marker appended when the window cuts the buffer short.
pub const TRUNCATION_MARKER: &str = "...";

/// A math delimiter token at the byte offset of its first `$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MathToken {
    /// `$$` display-math delimiter.
    Display(usize),
    /// Single `$` inline-math delimiter.
    Inline(usize),
}

/// Scans math tokens with greedy left-to-right pairing: a `$` immediately
/// followed by another `$` is one display token (both consumed), any other
/// `$` is an inline token. `$$$` is therefore one display token plus one
/// inline token.
fn math_tokens(buffer: &str) -> Vec<MathToken> {
    let bytes = buffer.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            if bytes.get(i + 1) == Some(&b'$') {
                tokens.push(MathToken::Display(i));
                i += 2;
            } else {
                tokens.push(MathToken::Inline(i));
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    tokens
}

/// Longest prefix length (in bytes) free of unterminated math delimiters.
///
/// An odd display-token count truncates at the last display token; an odd
/// inline-token count truncates at the last inline token; the smaller
/// candidate wins. `$` is ASCII, so every offset is a char boundary and
/// the returned length always slices cleanly.
pub fn safe_len(buffer: &str) -> usize {
    let mut display_count = 0usize;
    let mut inline_count = 0usize;
    let mut last_display = None;
    let mut last_inline = None;

    for token in math_tokens(buffer) {
        match token {
            MathToken::Display(at) => {
                display_count += 1;
                last_display = Some(at);
            }
            MathToken::Inline(at) => {
                inline_count += 1;
                last_inline = Some(at);
            }
        }
    }

    let mut safe = buffer.len();
    if display_count % 2 == 1
        && let Some(at) = last_display
    {
        safe = safe.min(at);
    }
    if inline_count % 2 == 1
        && let Some(at) = last_inline
    {
        safe = safe.min(at);
    }
    safe
}

/// The displayable portion of the buffer for the given stream state.
///
/// Terminal states return the buffer unchanged. While streaming, an
/// unterminated delimiter truncates the buffer at the delimiter's offset
/// and appends the truncation marker.
pub fn visible_prefix(buffer: &str, state: StreamState) -> Cow<'_, str> {
    if state.is_terminal() {
        return Cow::Borrowed(buffer);
    }

    let safe = safe_len(buffer);
    if safe == buffer.len() {
        Cow::Borrowed(buffer)
    } else {
        Cow::Owned(format!("{}{}", &buffer[..safe], TRUNCATION_MARKER))
    }
}
