//! Grammar rules for parsing markup lines.
//!
//! The parser walks a single line left to right. At each position it
//! consumes, in order of preference, a run of whitespace, a tag token, or a
//! word. Line breaks are not part of the grammar; callers split lines first.

use nom::{
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{alpha1, char},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

use quire_core::markup::{MarkupLine, MarkupSegment, TagMap, TAG_RESET};

/// Parse one line of markup into segments.
///
/// Whitespace runs collapse to a single space segment with no tags. Tag
/// tokens update the open tag state and are not emitted. Everything else
/// is emitted as words carrying a copy of the open tags. Malformed tag text
/// is treated as part of a word.
pub fn parse_line(text: &str) -> MarkupLine {
    let mut segments = Vec::new();
    let mut open_tags = TagMap::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Ok((tail, _)) = whitespace(rest) {
            segments.push(MarkupSegment::space());
            rest = tail;
            continue;
        }

        if let Ok((tail, (name, params))) = tag_token(rest) {
            apply_tag(&mut open_tags, name, params);
            rest = tail;
            continue;
        }

        let end = word_end(rest);
        segments.push(MarkupSegment::new(&rest[..end], open_tags.clone()));
        rest = &rest[end..];
    }

    segments
}

/// Parse multi-line text, each line independently.
pub fn parse_lines(text: &str) -> Vec<MarkupLine> {
    text.lines().map(parse_line).collect()
}

/// Update the open tag state for one tag token.
fn apply_tag(open_tags: &mut TagMap, name: &str, params: Vec<&str>) {
    if name == TAG_RESET {
        open_tags.clear();
        return;
    }

    if params.is_empty() && open_tags.contains_key(name) {
        open_tags.shift_remove(name);
    } else {
        open_tags.insert(
            name.to_string(),
            params.into_iter().map(str::to_string).collect(),
        );
    }
}

/// Parse a tag token: `^(NAME[,PARAM]*)`.
fn tag_token(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    delimited(
        tag("^("),
        pair(alpha1, many0(preceded(char(','), is_not(",)")))),
        char(')'),
    )(input)
}

/// Parse a run of whitespace.
fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_whitespace())(input)
}

/// Byte length of the word at the start of `input`.
///
/// A word ends at whitespace or at the start of a well-formed tag token.
fn word_end(input: &str) -> usize {
    for (idx, c) in input.char_indices() {
        if c.is_whitespace() {
            return idx;
        }
        if idx > 0 && c == '^' && tag_token(&input[idx..]).is_ok() {
            return idx;
        }
    }
    input.len()
}
