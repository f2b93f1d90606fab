use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod fixtures;
use fixtures::{framed_response, stream_response};

#[tokio::test]
async fn test_exec_streams_framed_records() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/claude/stream"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"prompt": "hello"})))
        .respond_with(framed_response(&["Hello", " there!"]))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .env("QUILL_GATEWAY_URL", mock_server.uri())
        .args(["exec", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello there!"));
}

#[tokio::test]
async fn test_exec_renders_unbalanced_math_once_complete() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    // The stream ends with an odd number of delimiters; the terminal
    // state still prints the buffer verbatim.
    Mock::given(method("POST"))
        .and(path("/api/claude/stream"))
        .respond_with(framed_response(&["the fee is $5", "0 per month"]))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .env("QUILL_GATEWAY_URL", mock_server.uri())
        .args(["exec", "what does it cost?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("the fee is $50 per month"));
}

#[tokio::test]
async fn test_exec_accepts_unframed_body() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/claude/stream"))
        .respond_with(stream_response("plain body, no framing"))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .env("QUILL_GATEWAY_URL", mock_server.uri())
        .args(["exec", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plain body, no framing"));
}

#[tokio::test]
async fn test_exec_displays_http_error_and_exits_zero() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    let error_body = serde_json::json!({ "detail": "model overloaded" });

    Mock::given(method("POST"))
        .and(path("/api/claude/stream"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body))
        .mount(&mock_server)
        .await;

    // The failure is the displayed content, not a process fault.
    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .env("QUILL_GATEWAY_URL", mock_server.uri())
        .args(["exec", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: HTTP 500: model overloaded"));
}

#[tokio::test]
async fn test_exec_displays_connect_failure_and_exits_zero() {
    let home = tempdir().unwrap();

    // Bind a port, then release it so the connection is refused.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .env("QUILL_GATEWAY_URL", format!("http://127.0.0.1:{port}"))
        .args(["exec", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error:"));
}

#[tokio::test]
async fn test_exec_reassembles_multibyte_text() {
    let home = tempdir().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/claude/stream"))
        .respond_with(framed_response(&["naïve 数学 🚀"]))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .env("QUILL_GATEWAY_URL", mock_server.uri())
        .args(["exec", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("naïve 数学 🚀"));
}
