//! Split a document into literal code regions and rewritable prose.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// One contiguous slice of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region<'a> {
    /// A backtick span or `<pre>`/`<code>` element, delimiters included.
    Code(&'a str),
    /// Everything between code regions.
    Prose(&'a str),
}

impl<'a> Region<'a> {
    /// The exact source text of this region.
    pub const fn text(&self) -> &'a str {
        return match self {
            Region::Code(text) | Region::Prose(text) => text,
        };
    }
}

/// HTML elements whose content is literal.
const LITERAL_TAGS: [(&str, &str); 2] = [("<pre>", "</pre>"), ("<code>", "</code>")];

/// Shortest backtick run that opens a fenced block when it starts a line.
const FENCE_MIN: usize = 3;

/// A blank line: two newlines with only whitespace between them.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| return Regex::new(r"\n[ \t\r]*\n").expect("valid regex"));

/// Tokenize `text` into code and prose regions in source order.
///
/// Concatenating the text of every region gives back `text` exactly.
/// A backtick run of length n closes at the next run of exactly n backticks.
/// Inline spans end at a blank line; a run of three or more backticks that
/// opens a line is a fence and may close any number of lines later. A run
/// with no closer is prose. Literal tags need non-empty content and close
/// at the first end tag.
pub fn split_regions(text: &str) -> Vec<Region<'_>> {
    let bytes = text.as_bytes();
    let closers = Closers::collect(text);
    let mut regions = Vec::new();
    let mut prose_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(code_end) = closers.code_region_end(text, pos) else {
            pos = pos.saturating_add(skip_len(bytes, pos));
            continue;
        };

        if let Some(prose) = text.get(prose_start..pos)
            && !prose.is_empty()
        {
            regions.push(Region::Prose(prose));
        }
        if let Some(code) = text.get(pos..code_end) {
            regions.push(Region::Code(code));
        }
        pos = code_end;
        prose_start = code_end;
    }

    if let Some(rest) = text.get(prose_start..)
        && !rest.is_empty()
    {
        regions.push(Region::Prose(rest));
    }
    return regions;
}

/// Every position an opener could close at, gathered in one pass so each
/// opener is matched by binary search instead of a scan to the end.
struct Closers {
    /// Start offsets of every maximal backtick run, keyed by run length.
    runs: HashMap<usize, Vec<usize>>,
    /// Start offsets of blank lines.
    paragraph_breaks: Vec<usize>,
    /// Start offsets of each end tag, in `LITERAL_TAGS` order.
    end_tags: [Vec<usize>; 2],
}

impl Closers {
    /// Scan `text` once for backtick runs, blank lines and end tags.
    fn collect(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut runs: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut pos = 0;
        while let Some(offset) = bytes
            .get(pos..)
            .and_then(|tail| return tail.iter().position(|&b| return b == b'`'))
        {
            let start = pos.saturating_add(offset);
            let len = run_length(bytes, start);
            runs.entry(len).or_default().push(start);
            pos = start.saturating_add(len);
        }

        return Self {
            runs,
            paragraph_breaks: BLANK_LINE.find_iter(text).map(|m| return m.start()).collect(),
            end_tags: LITERAL_TAGS.map(|(_, close)| return text.match_indices(close).map(|(at, _)| return at).collect()),
        };
    }

    /// End offset of a code region starting exactly at `pos`, if one does.
    fn code_region_end(&self, text: &str, pos: usize) -> Option<usize> {
        let rest = text.get(pos..)?;
        if rest.starts_with('`') {
            return self.backtick_span_end(text.as_bytes(), pos);
        }
        return LITERAL_TAGS
            .iter()
            .zip(&self.end_tags)
            .find_map(|((open, close), ends)| {
                let content = rest.strip_prefix(open)?;
                // At least one character of content before the end tag.
                let first = content.chars().next()?;
                let content_start = pos.saturating_add(open.len()).saturating_add(first.len_utf8());
                let end = first_at_or_after(ends, content_start)?;
                return Some(end.saturating_add(close.len()));
            });
    }

    /// End offset of the backtick span opened by the run at `pos`.
    fn backtick_span_end(&self, bytes: &[u8], pos: usize) -> Option<usize> {
        let open_len = run_length(bytes, pos);
        let content_start = pos.saturating_add(open_len);
        // Runs are maximal, so a same-length run after the opener leaves content between them.
        let close = first_at_or_after(self.runs.get(&open_len)?, content_start)?;

        let fenced = open_len >= FENCE_MIN && opens_line(bytes, pos);
        if !fenced && first_at_or_after(&self.paragraph_breaks, content_start).is_some_and(|at| return at < close) {
            return None;
        }
        return Some(close.saturating_add(open_len));
    }
}

/// Smallest entry of the sorted `positions` that is at least `from`.
fn first_at_or_after(positions: &[usize], from: usize) -> Option<usize> {
    let idx = positions.partition_point(|&at| return at < from);
    return positions.get(idx).copied();
}

/// Whether only spaces or tabs precede `pos` on its line.
fn opens_line(bytes: &[u8], pos: usize) -> bool {
    return bytes.get(..pos).is_some_and(|head| {
        return head
            .iter()
            .rev()
            .take_while(|&&b| return b != b'\n')
            .all(|&b| return b == b' ' || b == b'\t');
    });
}

/// Number of consecutive backticks starting at `pos`.
fn run_length(bytes: &[u8], pos: usize) -> usize {
    return bytes
        .get(pos..)
        .map_or(0, |tail| return tail.iter().take_while(|&&b| return b == b'`').count());
}

/// How far to advance when no code region starts at `pos`: past a whole
/// unmatched backtick run, else past one character.
fn skip_len(bytes: &[u8], pos: usize) -> usize {
    let run = run_length(bytes, pos);
    if run > 0 {
        return run;
    }
    // Step over a whole UTF-8 sequence so slices stay on char boundaries.
    let mut len = 1_usize;
    while bytes
        .get(pos.saturating_add(len))
        .is_some_and(|b| return (b & 0xC0) == 0x80)
    {
        len = len.saturating_add(1);
    }
    return len;
}
