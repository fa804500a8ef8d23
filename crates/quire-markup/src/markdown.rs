//! Markdown to markup conversion.
//!
//! Headings and strong emphasis become bold, emphasis becomes italic, list
//! items get a bullet prefix, and blocks are separated by a blank line.
//! The output is one markup line per rendered text line.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use quire_core::markup::MarkupLine;

use crate::grammar::parse_line;

const BOLD: &str = "^(b)";
const ITALIC: &str = "^(i)";
const BULLET: &str = " \u{2022} ";

/// Convert a Markdown document into markup lines.
pub fn markdown_to_markup(text: &str) -> Vec<String> {
    let mut writer = MarkupWriter::default();
    for event in Parser::new(text) {
        writer.event(event);
    }
    writer.finish()
}

/// Convert a Markdown document and parse each resulting line into segments.
pub fn parse_markdown(text: &str) -> Vec<MarkupLine> {
    markdown_to_markup(text)
        .iter()
        .map(|line| parse_line(line))
        .collect()
}

#[derive(Default)]
struct MarkupWriter {
    lines: Vec<String>,
    current: String,
    list_depth: usize,
    in_code_block: bool,
}

impl MarkupWriter {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(text) => self.current.push_str(&text),
            Event::SoftBreak => self.current.push(' '),
            Event::HardBreak => self.break_line(),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => {
                self.block_separator();
                self.current.push_str(BOLD);
            }
            Tag::Paragraph if self.list_depth == 0 => self.block_separator(),
            Tag::List(_) => {
                if self.list_depth == 0 {
                    self.block_separator();
                }
                self.list_depth += 1;
            }
            Tag::Item => {
                self.break_line();
                self.current.push_str(BULLET);
            }
            Tag::CodeBlock(_) => {
                self.block_separator();
                self.in_code_block = true;
            }
            Tag::Emphasis => self.current.push_str(ITALIC),
            Tag::Strong => self.current.push_str(BOLD),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.current.push_str(BOLD);
                self.block_separator();
            }
            TagEnd::Paragraph if self.list_depth == 0 => self.block_separator(),
            TagEnd::Paragraph | TagEnd::Item => self.break_line(),
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    self.block_separator();
                } else {
                    self.break_line();
                }
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.block_separator();
            }
            TagEnd::Emphasis => self.current.push_str(ITALIC),
            TagEnd::Strong => self.current.push_str(BOLD),
            _ => {}
        }
    }

    /// Append text, ending a line at every embedded newline. Code blocks
    /// keep their blank lines.
    fn text(&mut self, text: &str) {
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            self.current.push_str(first);
        }
        for piece in pieces {
            if self.in_code_block {
                self.lines.push(std::mem::take(&mut self.current));
            } else {
                self.break_line();
            }
            self.current.push_str(piece);
        }
    }

    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    /// End the current line and leave one blank line, never two.
    fn block_separator(&mut self) {
        self.break_line();
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.break_line();
        while self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}
