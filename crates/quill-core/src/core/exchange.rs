//! One exchange, end to end.
//!
//! `run_exchange` is the single sequential read loop of an exchange:
//! submit the prompt, feed every chunk through the assembler, settle the
//! session entry with the outcome. Transport failures never propagate past
//! this module — they become the exchange's Failed content, displayed to
//! the user, never retried.
//!
//! There is no timeout or cancellation path: a stalled gateway stalls the
//! loop until the connection drops. Known limitation.

use anyhow::Result;
use futures_util::StreamExt;

use crate::core::events::UpdateSender;
use crate::core::session::Session;
use crate::providers::{GatewayClient, ProviderError};
use crate::stream::StreamAssembler;

/// Runs one exchange to its terminal state.
///
/// Returns the settled response text — for a Failed exchange that is the
/// error message, since failures are content here, not faults.
///
/// # Errors
/// Fails only if a prior exchange is still in flight.
pub async fn run_exchange(
    client: &GatewayClient,
    session: &mut Session,
    prompt: &str,
    updates: UpdateSender,
) -> Result<String> {
    session.begin(prompt)?;

    let mut assembler = StreamAssembler::new(updates);

    match client.stream_prompt(prompt).await {
        Ok(mut chunks) => {
            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(bytes) => assembler.push_chunk(&bytes).await,
                    Err(err) => {
                        let err = ProviderError::from_reqwest(&err);
                        tracing::warn!(kind = %err.kind, "stream failed mid-body: {err}");
                        assembler.fail(&err.message).await;
                        break;
                    }
                }
            }
            // No-op when a mid-body failure already settled the state.
            assembler.finish().await;
        }
        Err(err) => {
            tracing::warn!(kind = %err.kind, "request failed: {err}");
            assembler.fail(&err.message).await;
        }
    }

    let text = assembler.buffer().to_string();
    session.settle(text.clone(), assembler.state());
    Ok(text)
}
