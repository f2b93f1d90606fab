//! Framed-body helpers for gateway mock tests.

#![allow(dead_code)]

use wiremock::ResponseTemplate;

/// Frames each payload as one `data: ...\n\n` record.
pub fn framed_body(records: &[&str]) -> String {
    records.iter().map(|r| format!("data: {r}\n\n")).collect()
}

/// Wraps a framed (or raw) body in a streaming response template.
pub fn stream_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body.to_string())
}

/// Convenience: framed records wrapped in a response template.
pub fn framed_response(records: &[&str]) -> ResponseTemplate {
    stream_response(&framed_body(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_body_terminates_every_record() {
        let body = framed_body(&["one", "two"]);
        assert_eq!(body, "data: one\n\ndata: two\n\n");
    }
}
