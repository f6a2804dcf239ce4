//! Capture-group rewriting
//!
//! [`replace_submatches`] is a generic text-editing primitive: for every
//! non-overlapping match of a pattern (a *frame*) the callback receives the
//! contents of the frame's capture groups and returns their replacements.
//! Only the group spans change. Bytes before, between and after groups, and
//! between frames, are copied through untouched.
//!
//! It works on raw bytes, so input does not have to be valid UTF-8, and it
//! knows nothing about placeholders; see [`crate::placeholder`] for that.

use std::ops::Range;

use regex::bytes::Regex;

/// Rewrite the capture groups of up to `limit` frames of `pattern` in `src`.
///
/// The callback is invoked once per frame with the group contents, in group
/// order. Its returned list is matched to the same slots by position: a
/// missing entry keeps the original group bytes, extra entries are ignored.
///
/// Groups that did not participate in the match are not passed to the
/// callback. Groups nested inside an earlier group of the same frame are
/// dropped as well, so the spans handed out never overlap.
///
/// Frames past `limit` are left as they are.
pub fn replace_submatches<F>(pattern: &Regex, src: &[u8], limit: usize, mut repl: F) -> Vec<u8>
where
    F: FnMut(&[&[u8]]) -> Vec<Vec<u8>>,
{
    let mut result = Vec::with_capacity(src.len());
    let mut last = 0;

    for caps in pattern.captures_iter(src).take(limit) {
        let Some(frame) = caps.get(0) else {
            continue;
        };

        let spans = group_spans(caps.iter().skip(1).flatten().map(|m| m.range()));
        let groups: Vec<&[u8]> = spans.iter().map(|span| &src[span.clone()]).collect();
        let replacements = repl(&groups);

        // Non-matched bytes since the previous frame
        result.extend_from_slice(&src[last..frame.start()]);

        let mut cursor = frame.start();
        for (idx, span) in spans.iter().enumerate() {
            result.extend_from_slice(&src[cursor..span.start]);
            match replacements.get(idx) {
                Some(new_value) => result.extend_from_slice(new_value),
                None => result.extend_from_slice(&src[span.clone()]),
            }
            cursor = span.end;
        }
        result.extend_from_slice(&src[cursor..frame.end()]);

        last = frame.end();
    }

    result.extend_from_slice(&src[last..]);
    result
}

/// Keep group spans in order, dropping any that start inside a kept one.
fn group_spans(ranges: impl Iterator<Item = Range<usize>>) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    for range in ranges {
        if spans.last().is_some_and(|prev| range.start < prev.end) {
            continue;
        }
        spans.push(range);
    }
    spans
}
