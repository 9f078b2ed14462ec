//! Span bookkeeping, existing-mark parsing and markup rendering
//!
//! Spans are byte ranges over the *unescaped* text. Escaping happens only at
//! render time, so match offsets never have to account for entities.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

static MARK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<mark(?: class="(monetary-exact|monetary-partial)")?>([^<]*)</mark>"#)
        .unwrap_or_else(|e| panic!("invalid mark pattern: {e}"))
});

const EXACT_CLASS: &str = "monetary-exact";
const PARTIAL_CLASS: &str = "monetary-partial";

/// Kind of emphasis applied to a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MarkKind {
    /// Plain text hit
    Text,
    /// Amount equal to the query amount or inside the query range
    MonetaryExact,
    /// Amount matched by the prefix ladder
    MonetaryPartial,
}

impl MarkKind {
    pub fn open_tag(&self) -> &'static str {
        match self {
            MarkKind::Text => "<mark>",
            MarkKind::MonetaryExact => r#"<mark class="monetary-exact">"#,
            MarkKind::MonetaryPartial => r#"<mark class="monetary-partial">"#,
        }
    }

    pub fn close_tag(&self) -> &'static str {
        "</mark>"
    }

    fn from_class(class: Option<&str>) -> Self {
        match class {
            Some(EXACT_CLASS) => MarkKind::MonetaryExact,
            Some(PARTIAL_CLASS) => MarkKind::MonetaryPartial,
            _ => MarkKind::Text,
        }
    }
}

/// A highlighted byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub kind: MarkKind,
}

impl HighlightSpan {
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Non-overlapping spans, claimed first-come first-served
#[derive(Debug, Clone, Default)]
pub struct SpanSet {
    spans: Vec<HighlightSpan>,
}

impl SpanSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from spans that are already marked in the input
    pub fn with_claimed(spans: Vec<HighlightSpan>) -> Self {
        Self { spans }
    }

    pub fn is_free(&self, start: usize, end: usize) -> bool {
        !self.spans.iter().any(|s| s.overlaps(start, end))
    }

    /// Claim a range; rejected if empty or touching an existing claim
    pub fn claim(&mut self, start: usize, end: usize, kind: MarkKind) -> bool {
        if start >= end || !self.is_free(start, end) {
            return false;
        }
        self.spans.push(HighlightSpan { start, end, kind });
        true
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn into_sorted(mut self) -> Vec<HighlightSpan> {
        self.spans.sort_by_key(|s| s.start);
        self.spans
    }
}

/// Input split into plain text plus the spans it already carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedText {
    pub text: String,
    pub spans: Vec<HighlightSpan>,
}

/// Recover plain text and existing marks from possibly-highlighted input.
///
/// Input is taken as markup only when it holds at least one complete pair in
/// the exact form [`MarkKind::open_tag`] and [`MarkKind::close_tag`] emit.
/// Then entities are decoded and every marked segment becomes a pre-claimed
/// span. Anything else, a stray `<mark` included, is raw text.
pub fn parse_marked(input: &str) -> MarkedText {
    if !MARK_RE.is_match(input) {
        return MarkedText {
            text: input.to_string(),
            spans: Vec::new(),
        };
    }

    let mut text = String::with_capacity(input.len());
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in MARK_RE.captures_iter(input) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        text.push_str(&unescape_html(&input[cursor..whole.start()]));

        let start = text.len();
        text.push_str(&unescape_html(inner.as_str()));
        let kind = MarkKind::from_class(caps.get(1).map(|m| m.as_str()));
        if text.len() > start {
            spans.push(HighlightSpan {
                start,
                end: text.len(),
                kind,
            });
        }
        cursor = whole.end();
    }
    text.push_str(&unescape_html(&input[cursor..]));

    MarkedText { text, spans }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Escape `text` and wrap each span; spans are spliced last-to-first
pub fn render(text: &str, spans: &[HighlightSpan]) -> String {
    let mut sorted: Vec<&HighlightSpan> = spans.iter().collect();
    sorted.sort_by_key(|s| s.start);

    let mut pieces: Vec<String> = Vec::with_capacity(sorted.len() * 4 + 1);
    let mut cursor = text.len();
    for span in sorted.into_iter().rev() {
        if span.end > cursor || span.start >= span.end {
            continue;
        }
        pieces.push(escape_html(&text[span.end..cursor]));
        pieces.push(span.kind.close_tag().to_string());
        pieces.push(escape_html(&text[span.start..span.end]));
        pieces.push(span.kind.open_tag().to_string());
        cursor = span.start;
    }
    pieces.push(escape_html(&text[..cursor]));

    pieces.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_reject_overlap() {
        let mut set = SpanSet::new();
        assert!(set.claim(0, 5, MarkKind::Text));
        assert!(!set.claim(3, 8, MarkKind::Text));
        assert!(set.claim(5, 8, MarkKind::MonetaryExact));
        assert!(!set.claim(6, 6, MarkKind::Text));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_render_escapes_outside_and_inside_marks() {
        let text = "A&B <pour> \"slab\"";
        let spans = [HighlightSpan {
            start: 4,
            end: 10,
            kind: MarkKind::Text,
        }];
        assert_eq!(
            render(text, &spans),
            "A&amp;B <mark>&lt;pour&gt;</mark> &quot;slab&quot;"
        );
    }

    #[test]
    fn test_render_multiple_spans_in_order() {
        let text = "Total $1,200 due";
        let spans = [
            HighlightSpan {
                start: 13,
                end: 16,
                kind: MarkKind::Text,
            },
            HighlightSpan {
                start: 6,
                end: 12,
                kind: MarkKind::MonetaryPartial,
            },
        ];
        assert_eq!(
            render(text, &spans),
            r#"Total <mark class="monetary-partial">$1,200</mark> <mark>due</mark>"#
        );
    }

    #[test]
    fn test_parse_marked_round_trips_render() {
        let text = "Tom & Jerry's $500 <invoice>";
        let spans = vec![
            HighlightSpan {
                start: 0,
                end: 3,
                kind: MarkKind::Text,
            },
            HighlightSpan {
                start: 14,
                end: 18,
                kind: MarkKind::MonetaryExact,
            },
        ];
        let rendered = render(text, &spans);
        let parsed = parse_marked(&rendered);
        assert_eq!(parsed.text, text);
        assert_eq!(parsed.spans, spans);
        assert_eq!(render(&parsed.text, &parsed.spans), rendered);
    }

    #[test]
    fn test_raw_text_is_not_unescaped() {
        let parsed = parse_marked("Fish &amp; Chips");
        assert_eq!(parsed.text, "Fish &amp; Chips");
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn test_stray_or_foreign_marks_are_raw_text() {
        for input in [
            "Fish &amp; Chips <mark",
            "<mark>Fish &amp; Chips",
            r#"<mark style="x">Fish</mark> &amp; Chips"#,
            "<mark >Fish</mark> &amp; Chips",
        ] {
            let parsed = parse_marked(input);
            assert_eq!(parsed.text, input);
            assert!(parsed.spans.is_empty());
        }
    }
}
