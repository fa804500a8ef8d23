//! Greedy line wrapping of markup segments into text runs.
//!
//! Each segment becomes one [`TextRun`], rendered once to measure it. Runs
//! are packed onto the current line while they fit. A run that overflows
//! goes to a fresh line when less than half of it would fit on the current
//! one; a run that still does not fit is split at character level, with a
//! hyphen after every piece except the last.

use log::{debug, trace, warn};
use quire_core::{DVec2, MarkupSegment, RenderError, TextDefaults};
use quire_render::RasterEngine;

use crate::object::{RenderOptions, Visual};
use crate::text_run::TextRun;

/// One wrapped output line: measured runs, left to right.
pub type FlowLine = Vec<TextRun>;

/// Summed measured width of a wrapped line, in millimeters.
pub fn line_width_mm(line: &[TextRun]) -> f64 {
    line.iter().map(|run| run.size_mm().x).sum()
}

/// Line wrapping context: how runs are styled and measured.
pub struct TextFlow<'a> {
    engine: &'a dyn RasterEngine,
    defaults: &'a TextDefaults,
    resolution: u32,
}

impl<'a> TextFlow<'a> {
    pub fn new(engine: &'a dyn RasterEngine, defaults: &'a TextDefaults, resolution: u32) -> Self {
        Self {
            engine,
            defaults,
            resolution,
        }
    }

    /// Wrap one markup line into output lines no wider than `width_mm`.
    ///
    /// Returned runs are already rendered. Their positions hold the
    /// horizontal offset within their output line.
    pub fn wrap(
        &self,
        segments: &[MarkupSegment],
        width_mm: f64,
    ) -> Result<Vec<FlowLine>, RenderError> {
        let mut lines = LineBuilder::default();

        for segment in segments {
            let run = TextRun::from_segment(DVec2::new(lines.cursor, 0.0), segment, self.defaults);
            let (run, run_width) = self.measure(run)?;

            if lines.cursor + run_width <= width_mm {
                lines.push(run, run_width);
                continue;
            }

            if lines.cursor + run_width / 2.0 > width_mm {
                debug!(
                    "moving {:?} ({:.2}mm) to a new line at {:.2}mm",
                    run.text(),
                    run_width,
                    lines.cursor
                );
                lines.flush();
            }

            if lines.cursor + run_width <= width_mm {
                lines.push(run, run_width);
            } else {
                self.split(&mut lines, &run, run_width, width_mm)?;
            }
        }

        Ok(lines.finish())
    }

    fn measure(&self, mut run: TextRun) -> Result<(TextRun, f64), RenderError> {
        let options = RenderOptions::new().with_resolution(self.resolution);
        run.finalize(self.engine, &options)?;
        let width = run.size_mm().x;
        trace!("measured {:?}: {:.3}mm", run.text(), width);
        Ok((run, width))
    }

    /// Place `run` as hyphenated pieces, starting on the current line.
    fn split(
        &self,
        lines: &mut LineBuilder,
        run: &TextRun,
        run_width: f64,
        width_mm: f64,
    ) -> Result<(), RenderError> {
        let chars: Vec<char> = run.text().chars().collect();
        let char_width = run_width / chars.len().max(1) as f64;
        let estimate = |available: f64| -> isize {
            if char_width > 0.0 {
                (available / char_width).floor() as isize
            } else {
                chars.len() as isize
            }
        };

        debug!(
            "splitting {:?} ({:.2}mm) at {:.2}mm of {:.2}mm",
            run.text(),
            run_width,
            lines.cursor,
            width_mm
        );

        let mut rest: &[char] = &chars;
        let mut take = estimate(width_mm - lines.cursor);

        while !rest.is_empty() {
            let take_n = take.min(rest.len() as isize);

            if take_n <= 0 {
                if !lines.is_fresh() {
                    lines.flush();
                    take = rest.len() as isize;
                    continue;
                }

                // Not even one character fits on an empty line.
                let (piece, piece_width) = self.measure(run.restyled(piece_text(rest, 1)))?;
                warn!(
                    "{:?} is {:.2}mm wide and cannot fit in {:.2}mm",
                    piece.text(),
                    piece_width,
                    width_mm
                );
                lines.push(piece, piece_width);
                rest = &rest[1..];
                if !rest.is_empty() {
                    lines.flush();
                }
                take = estimate(width_mm);
                continue;
            }

            let n = take_n as usize;
            let (piece, piece_width) = self.measure(run.restyled(piece_text(rest, n)))?;
            if lines.cursor + piece_width > width_mm {
                take = take_n - 1;
                continue;
            }

            lines.push(piece, piece_width);
            rest = &rest[n..];
            if !rest.is_empty() {
                lines.flush();
                take = estimate(width_mm);
            }
        }

        Ok(())
    }
}

/// The first `n` characters of `rest`, hyphenated when more remain.
fn piece_text(rest: &[char], n: usize) -> String {
    let mut text: String = rest[..n].iter().collect();
    if n < rest.len() {
        text.push('-');
    }
    text
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<FlowLine>,
    current: FlowLine,
    cursor: f64,
}

impl LineBuilder {
    fn push(&mut self, mut run: TextRun, width: f64) {
        run.set_position_mm(DVec2::new(self.cursor, 0.0));
        self.cursor += width;
        self.current.push(run);
    }

    fn is_fresh(&self) -> bool {
        self.current.is_empty()
    }

    /// End the current line. An empty line is never emitted mid-flow.
    fn flush(&mut self) {
        if self.is_fresh() {
            return;
        }
        self.lines.push(std::mem::take(&mut self.current));
        self.cursor = 0.0;
    }

    fn finish(mut self) -> Vec<FlowLine> {
        self.lines.push(self.current);
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quire_core::units;
    use quire_render::SoftwareEngine;

    // 12pt at 72ppi with the software engine: 7px per character.
    const PPI: u32 = 72;

    fn char_mm() -> f64 {
        units::px_to_mm(7.0, PPI)
    }

    fn texts(lines: &[FlowLine]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|line| line.iter().map(|run| run.text().to_string()).collect())
            .collect()
    }

    fn wrap(segments: &[MarkupSegment], width_mm: f64) -> Vec<FlowLine> {
        let engine = SoftwareEngine::new();
        let defaults = TextDefaults::default();
        TextFlow::new(&engine, &defaults, PPI)
            .wrap(segments, width_mm)
            .unwrap()
    }

    fn words(text: &str) -> Vec<MarkupSegment> {
        quire_markup::parse_line(text)
    }

    #[test]
    fn test_fits_on_one_line() {
        let lines = wrap(&words("hello world"), 50.0);
        assert_eq!(texts(&lines), vec![vec!["hello", " ", "world"]]);

        let offsets: Vec<f64> = lines[0].iter().map(|run| run.position_mm().x).collect();
        assert_eq!(offsets[0], 0.0);
        assert!((offsets[2] - 6.0 * char_mm()).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_word_moves_to_next_line() {
        // 20 chars per 50mm; "aaaaaaaaaaaaaaa" (15) at cursor 16 overflows
        // and less than half of it fits, so it moves whole.
        let lines = wrap(&words("aaaaaaaaaaaaaaa bbbbbbbbbbbbbbb"), 50.0);
        assert_eq!(
            texts(&lines),
            vec![vec!["aaaaaaaaaaaaaaa", " "], vec!["bbbbbbbbbbbbbbb"]]
        );
    }

    #[test]
    fn test_half_fitting_word_is_split() {
        // "aaaaaaaaaaa " leaves 8 characters of room; a 14 character word has
        // more than half of itself fitting, so it is split in place.
        let lines = wrap(&words("aaaaaaaaaaa bbbbbbbbbbbbbb"), 50.0);
        assert_eq!(
            texts(&lines),
            vec![vec!["aaaaaaaaaaa", " ", "bbbbbbb-"], vec!["bbbbbbb"]]
        );
    }

    #[test]
    fn test_long_word_splits_with_hyphen() {
        let word = "x".repeat(33);
        let lines = wrap(&[MarkupSegment::plain(word.clone())], 50.0);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text(), format!("{}-", "x".repeat(19)));
        assert_eq!(lines[1][0].text(), "x".repeat(14));
        for line in &lines {
            assert!(line_width_mm(line) <= 50.0);
        }
    }

    #[test]
    fn test_split_pieces_keep_style() {
        let lines = wrap(&words(&format!("^(b){}", "y".repeat(30))), 50.0);
        for run in lines.iter().flatten() {
            assert_eq!(run.effective_font(), "DejaVu-Sans-Bold");
        }
    }

    #[test]
    fn test_narrow_box_places_single_characters() {
        // One character plus hyphen is 14px, wider than 3mm (about 8.5px).
        let lines = wrap(&[MarkupSegment::plain("abc")], 3.0);
        assert_eq!(texts(&lines), vec![vec!["a-"], vec!["b-"], vec!["c"]]);
    }

    #[test]
    fn test_empty_input_gives_one_empty_line() {
        let lines = wrap(&[], 50.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
    }

    #[test]
    fn test_runs_are_rendered() {
        let lines = wrap(&words("ab cd"), 50.0);
        for run in lines.iter().flatten() {
            assert!(run.image().is_some());
        }
    }

    fn word_strategy() -> impl Strategy<Value = String> {
        "[a-z]{1,40}"
    }

    proptest! {
        #[test]
        fn test_lines_never_exceed_width(
            words in prop::collection::vec(word_strategy(), 1..8),
            width in 10.0f64..120.0,
        ) {
            let segments = quire_markup::parse_line(&words.join(" "));
            let lines = wrap(&segments, width);
            for line in &lines {
                prop_assert!(line_width_mm(line) <= width);
            }
        }

        #[test]
        fn test_split_preserves_content(
            words in prop::collection::vec(word_strategy(), 1..8),
            width in 10.0f64..120.0,
        ) {
            let text = words.join(" ");
            let segments = quire_markup::parse_line(&text);
            let lines = wrap(&segments, width);

            let rebuilt: String = lines
                .iter()
                .flatten()
                .map(|run| run.text().trim_end_matches('-').to_string())
                .collect();
            prop_assert_eq!(rebuilt, text);
        }
    }
}
