//! Text markup parser for Quire documents.
//!
//! Markup tags are written as `^(TAG[,param[,param...]])`: a caret, an opening
//! parenthesis, the tag name, any comma-separated parameters, and a closing
//! parenthesis. Repeating a tag without parameters closes it again, so
//! `^(b)hello^(b) world` renders only "hello" in bold. `^(r)` closes every
//! open tag.
//!
//! Known tags:
//!
//! - `^(b)` - bold
//! - `^(i)` - italic
//! - `^(u)` - underline
//! - `^(c,COLOR)` - foreground color
//! - `^(f,FONT)` - font name
//! - `^(s,SIZE)` - font size
//! - `^(r)` - reset all tags
//!
//! Any other well-formed tag is tracked the same way and simply shows up in
//! the segment's tag map.

mod grammar;
#[cfg(feature = "markdown")]
mod markdown;

pub use grammar::{parse_line, parse_lines};
#[cfg(feature = "markdown")]
pub use markdown::{markdown_to_markup, parse_markdown};
