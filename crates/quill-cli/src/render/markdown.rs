//! Markdown rendering for the terminal.
//!
//! A pulldown-cmark event loop producing finished terminal lines. ANSI
//! styling (crossterm) is applied only when requested, so piped output
//! stays plain. Math spans are ordinary text to the parser and pass
//! through verbatim — the stream window upstream guarantees no dangling
//! delimiter mid-stream.

use crossterm::style::Stylize;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Renders markdown text into terminal lines.
pub fn render_markdown(text: &str, styled: bool) -> Vec<String> {
    let parser = Parser::new_ext(text, Options::empty());
    let mut renderer = MarkdownRenderer::new(styled);

    for event in parser {
        renderer.process_event(event);
    }

    renderer.finish()
}

/// One level of list nesting.
struct ListLevel {
    /// Next ordinal for ordered lists; None for bullet lists.
    ordered: Option<u64>,
}

/// Internal state for markdown rendering.
struct MarkdownRenderer {
    styled: bool,
    lines: Vec<String>,
    /// Text of the block currently being collected.
    current: String,
    list_stack: Vec<ListLevel>,
    in_code_block: bool,
    code_block_lang: Option<String>,
    heading: bool,
    quote_depth: usize,
    emphasis: usize,
    strong: usize,
    link_dest: Option<String>,
}

impl MarkdownRenderer {
    fn new(styled: bool) -> Self {
        Self {
            styled,
            lines: Vec::new(),
            current: String::new(),
            list_stack: Vec::new(),
            in_code_block: false,
            code_block_lang: None,
            heading: false,
            quote_depth: 0,
            emphasis: 0,
            strong: 0,
            link_dest: None,
        }
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => self.add_inline_code(&code),
            Event::SoftBreak => self.current.push(' '),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.ensure_blank();
                self.lines.push(self.apply_dim("─".repeat(40)));
            }
            // HTML, footnotes, and task markers are passed through as-is.
            Event::Html(html) | Event::InlineHtml(html) => self.current.push_str(&html),
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => {
                if self.list_stack.is_empty() {
                    self.ensure_blank();
                }
            }
            Tag::Heading { level, .. } => {
                self.ensure_blank();
                self.heading = true;
                self.current.push_str(&"#".repeat(level as usize));
                self.current.push(' ');
            }
            Tag::CodeBlock(kind) => {
                self.ensure_blank();
                self.in_code_block = true;
                self.code_block_lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                let fence = match &self.code_block_lang {
                    Some(lang) => format!("```{lang}"),
                    None => "```".to_string(),
                };
                self.lines.push(self.apply_dim(fence));
            }
            Tag::List(start) => {
                if self.list_stack.is_empty() {
                    self.ensure_blank();
                } else {
                    // A nested list interrupts the parent item's text.
                    self.flush_line();
                }
                self.list_stack.push(ListLevel { ordered: start });
            }
            Tag::Item => {
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(ListLevel {
                        ordered: Some(next),
                    }) => {
                        let marker = format!("{next}. ");
                        *next += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.current.push_str(&indent);
                self.current.push_str(&marker);
            }
            Tag::BlockQuote(_) => {
                self.ensure_blank();
                self.quote_depth += 1;
            }
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Link { dest_url, .. } => self.link_dest = Some(dest_url.to_string()),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Item => self.flush_line(),
            TagEnd::Heading(_) => {
                self.flush_line();
                self.heading = false;
            }
            TagEnd::CodeBlock => {
                // Leave code-block mode first: the trailing newline before
                // the closing fence must not flush as a blank code line.
                self.in_code_block = false;
                self.flush_line();
                self.code_block_lang = None;
                self.lines.push(self.apply_dim("```".to_string()));
            }
            TagEnd::List(_) => {
                self.list_stack.pop();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Link => {
                if let Some(dest) = self.link_dest.take()
                    && !self.current.ends_with(&dest)
                {
                    self.current.push_str(&format!(" ({dest})"));
                }
            }
            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            // Code blocks preserve exact text; newlines split lines here.
            for (i, piece) in text.split('\n').enumerate() {
                if i > 0 {
                    self.flush_line();
                }
                if self.current.is_empty() && !piece.is_empty() {
                    self.current.push_str("  ");
                }
                self.current.push_str(&self.style_code(piece));
            }
            return;
        }

        self.current.push_str(&self.style_inline(text));
    }

    fn add_inline_code(&mut self, code: &str) {
        if self.styled {
            self.current.push_str(&format!("{}", code.cyan()));
        } else {
            self.current.push_str(&format!("`{code}`"));
        }
    }

    /// Applies the active inline styles to a piece of text.
    fn style_inline(&self, text: &str) -> String {
        if !self.styled {
            return text.to_string();
        }
        if self.heading || self.strong > 0 {
            format!("{}", text.bold())
        } else if self.emphasis > 0 {
            format!("{}", text.italic())
        } else {
            text.to_string()
        }
    }

    fn style_code(&self, text: &str) -> String {
        if self.styled && !text.is_empty() {
            format!("{}", text.dim())
        } else {
            text.to_string()
        }
    }

    fn apply_dim(&self, text: String) -> String {
        if self.styled {
            format!("{}", text.dim())
        } else {
            text
        }
    }

    /// Finishes the current line, applying any block quote prefix.
    fn flush_line(&mut self) {
        let text = std::mem::take(&mut self.current);
        if text.is_empty() && self.in_code_block {
            self.lines.push(String::new());
            return;
        }
        if text.is_empty() {
            return;
        }

        let prefix = "> ".repeat(self.quote_depth);
        self.lines.push(format!("{prefix}{text}"));
    }

    /// Inserts one blank separator line between blocks.
    fn ensure_blank(&mut self) {
        if let Some(last) = self.lines.last()
            && !last.is_empty()
        {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush_line();
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        self.lines
    }
}
