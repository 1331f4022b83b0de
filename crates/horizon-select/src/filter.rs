//! Search filter.
//!
//! Filtering is a case-insensitive literal substring search over option text.
//! The query is escaped before it is compiled, so characters that are
//! meaningful to the regex engine always match themselves. Matched options
//! keep registry order; there is no ranking.

use std::ops::Range;

use horizon_select_core::PerfSpan;
use horizon_select_core::logging::{span_names, targets};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};

use crate::registry::OptionRegistry;

/// One occurrence of the query inside an option's text.
///
/// Offsets are in bytes and always fall on char boundaries of that text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSpan {
    pub start: usize,
    pub len: usize,
}

impl MatchSpan {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// The result of filtering a registry with a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    query: String,
    matched_ids: Vec<String>,
    match_spans: IndexMap<String, Vec<MatchSpan>>,
}

impl FilterState {
    /// The state for an empty query: every option, no spans.
    pub fn unfiltered(registry: &OptionRegistry) -> Self {
        Self {
            query: String::new(),
            matched_ids: registry.ids().map(str::to_string).collect(),
            match_spans: IndexMap::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matched ids, a subsequence of registry order.
    pub fn matched_ids(&self) -> &[String] {
        &self.matched_ids
    }

    pub fn is_matched(&self, id: &str) -> bool {
        self.matched_ids.iter().any(|matched| matched == id)
    }

    /// Match spans for `id`. Empty for unmatched ids and for the empty query.
    pub fn spans(&self, id: &str) -> &[MatchSpan] {
        self.match_spans.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All spans keyed by option id, in matched order.
    pub fn match_spans(&self) -> &IndexMap<String, Vec<MatchSpan>> {
        &self.match_spans
    }

    pub fn len(&self) -> usize {
        self.matched_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched_ids.is_empty()
    }
}

/// Filter `registry` by `query`.
///
/// Total: any query, including one full of regex metacharacters, produces a
/// valid state.
pub fn filter(registry: &OptionRegistry, query: &str) -> FilterState {
    if query.is_empty() {
        return FilterState::unfiltered(registry);
    }

    let _perf = PerfSpan::new(span_names::FILTER);
    let pattern = SearchPattern::new(query);

    let mut matched_ids = Vec::new();
    let mut match_spans = IndexMap::new();
    for option in registry.iter() {
        let spans = pattern.find(&option.text);
        if !spans.is_empty() {
            matched_ids.push(option.id.clone());
            match_spans.insert(option.id.clone(), spans);
        }
    }

    tracing::trace!(
        target: targets::FILTER,
        query,
        matched = matched_ids.len(),
        total = registry.len(),
        "filtered options"
    );

    FilterState {
        query: query.to_string(),
        matched_ids,
        match_spans,
    }
}

/// A compiled case-insensitive literal search.
#[derive(Debug, Clone)]
pub(crate) struct SearchPattern {
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    /// Used only when the escaped query exceeds the regex size limits.
    AsciiFold(String),
}

impl SearchPattern {
    pub(crate) fn new(query: &str) -> Self {
        let matcher = match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Matcher::Regex(regex),
            Err(err) => {
                tracing::warn!(
                    target: targets::FILTER,
                    error = %err,
                    "query too large to compile, falling back to ASCII case folding"
                );
                Matcher::AsciiFold(query.to_string())
            }
        };
        Self { matcher }
    }

    /// Every non-overlapping occurrence in `text`, left to right. Each span
    /// covers exactly one occurrence, even when occurrences touch.
    pub(crate) fn find(&self, text: &str) -> Vec<MatchSpan> {
        match &self.matcher {
            Matcher::Regex(regex) => regex
                .find_iter(text)
                .filter(|found| !found.is_empty())
                .map(|found| MatchSpan::new(found.start(), found.len()))
                .collect(),
            Matcher::AsciiFold(needle) => ascii_fold_find(text, needle),
        }
    }
}

fn ascii_fold_find(text: &str, needle: &str) -> Vec<MatchSpan> {
    let haystack = text.as_bytes();
    let needle_bytes = needle.as_bytes();
    let mut spans = Vec::new();
    if needle_bytes.is_empty() || needle_bytes.len() > haystack.len() {
        return spans;
    }

    let mut start = 0;
    while start + needle_bytes.len() <= haystack.len() {
        let end = start + needle_bytes.len();
        if text.is_char_boundary(start)
            && text.is_char_boundary(end)
            && haystack[start..end].eq_ignore_ascii_case(needle_bytes)
        {
            spans.push(MatchSpan::new(start, needle_bytes.len()));
            start = end;
        } else {
            start += 1;
        }
    }
    spans
}

/// A piece of option text, marked as part of a match or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSegment<'t> {
    pub text: &'t str,
    pub is_match: bool,
}

/// Split `text` into ordered matched and unmatched segments.
///
/// Spans that touch are drawn as one matched segment. Spans that are out of
/// bounds, overlap an earlier span or do not fall on char boundaries are
/// ignored. Concatenating the segments yields `text`.
pub fn highlight_segments<'t>(text: &'t str, spans: &[MatchSpan]) -> Vec<TextSegment<'t>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    // Start of the trailing matched segment, if the last segment is a match.
    let mut open_match: Option<usize> = None;

    for span in spans {
        if span.len == 0 || span.start < cursor || text.get(span.range()).is_none() {
            continue;
        }
        let Some(before) = text.get(cursor..span.start) else {
            continue;
        };
        match open_match {
            Some(start) if before.is_empty() => {
                segments.pop();
                segments.push(TextSegment {
                    text: &text[start..span.end()],
                    is_match: true,
                });
            }
            _ => {
                if !before.is_empty() {
                    segments.push(TextSegment {
                        text: before,
                        is_match: false,
                    });
                }
                segments.push(TextSegment {
                    text: &text[span.range()],
                    is_match: true,
                });
                open_match = Some(span.start);
            }
        }
        cursor = span.end();
    }

    if cursor < text.len() {
        segments.push(TextSegment {
            text: &text[cursor..],
            is_match: false,
        });
    }
    segments
}
