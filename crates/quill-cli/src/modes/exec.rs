//! Single-shot exec mode.
//!
//! Streams the math-safe portion of the response to stdout as it grows;
//! with attachments, switches to the one-shot upload path. A Failed
//! exchange is displayed, not reported: its error text is the response
//! content, and the exit code stays zero.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use quill_core::config::Config;
use quill_core::core::events::{UpdateReceiver, create_update_channel};
use quill_core::core::exchange::run_exchange;
use quill_core::core::session::Session;
use quill_core::providers::{Attachment, GatewayClient};
use quill_core::stream::StreamState;

use crate::render::window::safe_len;

/// Sends one prompt and streams the response to stdout.
pub async fn run_exec(prompt: &str, config: &Config) -> Result<()> {
    let client = GatewayClient::new(config.effective_base_url());
    let mut session = Session::new();

    let (updates, rx) = create_update_channel();
    let printer = spawn_plain_printer(rx);

    run_exchange(&client, &mut session, prompt, updates).await?;
    let _ = printer.await;
    Ok(())
}

/// Prints newly-safe text as it arrives, append-only.
///
/// The safe length never moves backwards over an append-only buffer, so
/// printing suffix deltas is sound. The truncation marker is a TTY
/// affordance; plain output simply waits for text to become safe.
pub(crate) fn spawn_plain_printer(mut rx: UpdateReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        let mut printed = 0usize;

        while let Some(update) = rx.recv().await {
            if update.state == StreamState::Failed {
                // The buffer was replaced wholesale; start a fresh line.
                if printed > 0 {
                    let _ = writeln!(stdout);
                }
                let _ = writeln!(stdout, "{}", update.buffer);
                let _ = stdout.flush();
                continue;
            }

            let visible = if update.is_final() {
                update.buffer.len()
            } else {
                safe_len(&update.buffer)
            };
            if visible > printed {
                let _ = write!(stdout, "{}", &update.buffer[printed..visible]);
                let _ = stdout.flush();
                printed = visible;
            }
            if update.is_final() && printed > 0 {
                let _ = writeln!(stdout);
            }
        }
    })
}

/// Sends one prompt with attachments over the one-shot upload path.
pub async fn run_upload(prompt: &str, paths: &[PathBuf], config: &Config) -> Result<()> {
    let client = GatewayClient::new(config.effective_base_url());

    let mut attachments = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read attachment {}", path.display()))?;
        let name = path.file_name().map_or_else(
            || "attachment".to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        attachments.push(Attachment { name, bytes });
    }

    match client.upload(prompt, attachments).await {
        Ok(reply) => {
            if let Some(file) = &reply.file {
                tracing::debug!(%file, "gateway accepted attachment");
            }
            println!("{}", reply.response);
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}
