//! Interactive chat mode.
//!
//! A line-oriented loop over one session: each prompt streams its
//! response through the safe window before display. A TTY gets a
//! live-updating region that re-renders the safe prefix as markdown on
//! every snapshot (truncation marker included); piped output falls back
//! to append-only plain text.

use std::io::{IsTerminal, Write as _};

use anyhow::{Context, Result};
use crossterm::{QueueableCommand, cursor, terminal};
use tokio::task::JoinHandle;

use quill_core::config::{ColorMode, Config};
use quill_core::core::events::{UpdateReceiver, create_update_channel};
use quill_core::core::exchange::run_exchange;
use quill_core::core::session::Session;
use quill_core::providers::GatewayClient;

use crate::render::markdown::render_markdown;
use crate::render::window::visible_prefix;

/// Runs the interactive chat loop until `:q` or end of input.
pub async fn run_chat(config: &Config) -> Result<()> {
    let client = GatewayClient::new(config.effective_base_url());
    let mut session = Session::new();

    let interactive = std::io::stdout().is_terminal();
    let styled = match config.color {
        ColorMode::Auto => interactive,
        ColorMode::Always => true,
        ColorMode::Never => false,
    };

    println!("Quill Chat — :q to quit, :history to review this session.");

    loop {
        print!("> ");
        std::io::stdout().flush().context("flush prompt")?;

        let Some(line) = read_line().await? else {
            break; // end of input
        };

        match line.trim() {
            "" => continue,
            ":q" => break,
            ":history" => print_history(&session),
            prompt => {
                let (updates, rx) = create_update_channel();
                let view = if interactive {
                    spawn_live_view(rx, styled)
                } else {
                    crate::modes::exec::spawn_plain_printer(rx)
                };

                run_exchange(&client, &mut session, prompt, updates).await?;
                let _ = view.await;
                println!();
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Reads one line from stdin without blocking the runtime.
async fn read_line() -> Result<Option<String>> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map(|n| (n > 0).then_some(line))
    })
    .await
    .context("stdin task")??;
    Ok(line)
}

fn print_history(session: &Session) {
    if session.is_empty() {
        println!("(no exchanges yet)");
        return;
    }

    for exchange in session.exchanges() {
        println!("You: {}", exchange.prompt);
        println!("Claude: {}", exchange.response);
        println!();
    }
}

/// Re-renders the safe prefix as markdown on every snapshot.
///
/// Streaming redraws render unstyled so the wrapped line count stays
/// accurate (escape codes have no display width); the settled render gets
/// the styled pass, after which no redraw happens.
fn spawn_live_view(mut rx: UpdateReceiver, styled: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        let width = terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(80)
            .max(20);
        let mut stdout = std::io::stdout();
        let mut printed_lines = 0usize;

        while let Some(update) = rx.recv().await {
            let visible = visible_prefix(&update.buffer, update.state);
            let rendered = render_markdown(&visible, update.is_final() && styled);
            let lines = if update.is_final() {
                rendered
            } else {
                wrap_plain(rendered, width)
            };
            let _ = redraw(&mut stdout, &mut printed_lines, &lines);
        }
    })
}

fn redraw(
    out: &mut std::io::Stdout,
    printed_lines: &mut usize,
    lines: &[String],
) -> std::io::Result<()> {
    out.queue(cursor::MoveToColumn(0))?;
    if *printed_lines > 0 {
        out.queue(cursor::MoveUp(*printed_lines as u16))?;
    }
    out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    *printed_lines = lines.len();
    Ok(())
}

/// Hard-wraps plain lines at the terminal width so the redraw height
/// matches what the terminal actually shows.
fn wrap_plain(lines: Vec<String>, width: usize) -> Vec<String> {
    let mut wrapped = Vec::with_capacity(lines.len());
    for line in lines {
        if line.chars().count() <= width {
            wrapped.push(line);
            continue;
        }

        let mut current = String::new();
        let mut count = 0;
        for ch in line.chars() {
            current.push(ch);
            count += 1;
            if count == width {
                wrapped.push(std::mem::take(&mut current));
                count = 0;
            }
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_plain_keeps_short_lines() {
        let lines = vec!["short".to_string(), String::new()];
        assert_eq!(wrap_plain(lines.clone(), 20), lines);
    }

    #[test]
    fn test_wrap_plain_splits_at_width() {
        let lines = vec!["abcdefghij".to_string()];
        assert_eq!(wrap_plain(lines, 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_plain_counts_chars_not_bytes() {
        let lines = vec!["ééééé".to_string()];
        assert_eq!(wrap_plain(lines, 3), vec!["ééé", "éé"]);
    }
}
