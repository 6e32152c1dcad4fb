//! Inline markers carried through field values into the document.
//!
//! Two kinds of marker exist:
//!
//! - **Marker spans** wrap text that must end up bold:
//!   `<<B-{id}@@{payload}@@B-{id}-END>>`. The `id` pairs the opening and
//!   closing delimiter so unrelated spans on the same line cannot be confused.
//! - The **removal marker** replaces an empty bullet slot so the whole line
//!   can be deleted later.

use std::sync::OnceLock;

use regex::Regex;

/// Reserved text substituted for empty bullet slots
pub const REMOVAL_MARKER: &str = "<<DOCFILL-REMOVE-LINE>>";

fn marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX.get_or_init(|| {
        Regex::new(r"<<B-([A-Za-z0-9]+)@@(.*?)@@B-([A-Za-z0-9]+)-END>>")
            .expect("Invalid marker regex")
    })
}

fn bold_regex() -> &'static Regex {
    static BOLD_REGEX: OnceLock<Regex> = OnceLock::new();
    BOLD_REGEX.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"))
}

/// Text that must be styled once it lands in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpan {
    pub id: String,
    pub payload: String,
}

impl MarkerSpan {
    /// New span with a fresh random id
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            payload: payload.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// Delimited form embedded in field values
    pub fn encode(&self) -> String {
        format!("<<B-{id}@@{}@@B-{id}-END>>", self.payload, id = self.id)
    }
}

/// A well-formed marker span located in some text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundMarker {
    pub marker: MarkerSpan,
    /// The full delimited text, as it appears in the document
    pub raw: String,
    /// Byte range of `raw` within the searched text
    pub range: std::ops::Range<usize>,
}

/// All well-formed marker spans in `text`, in order.
///
/// Candidates whose opening and closing ids differ are malformed and skipped.
pub fn find_markers(text: &str) -> Vec<FoundMarker> {
    marker_regex()
        .captures_iter(text)
        .filter(|caps| caps[1] == caps[3])
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(FoundMarker {
                marker: MarkerSpan::with_id(&caps[1], &caps[2]),
                raw: whole.as_str().to_string(),
                range: whole.range(),
            })
        })
        .collect()
}

/// First well-formed marker span in `text`
pub fn first_marker(text: &str) -> Option<FoundMarker> {
    find_markers(text).into_iter().next()
}

/// Replace every well-formed marker span with its bare payload
pub fn strip_markers(text: &str) -> String {
    marker_regex()
        .replace_all(text, |caps: &regex::Captures| {
            if caps[1] == caps[3] {
                caps[2].to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Convert `**bold**` delimiters into marker spans
pub fn bold_to_markers(text: &str) -> String {
    bold_regex()
        .replace_all(text, |caps: &regex::Captures| {
            MarkerSpan::new(&caps[1]).encode()
        })
        .into_owned()
}

/// Drop `**bold**` delimiters, keeping the enclosed text
pub fn strip_bold(text: &str) -> String {
    bold_regex().replace_all(text, "$1").into_owned()
}

/// Value as a reader sees it: no marker delimiters, no bold delimiters
pub fn display_text(text: &str) -> String {
    strip_bold(&strip_markers(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_and_find() {
        let span = MarkerSpan::with_id("a1", "Rust");
        let text = format!("Built in {} and C", span.encode());

        let found = find_markers(&text);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].marker, span);
        assert_eq!(found[0].raw, "<<B-a1@@Rust@@B-a1-END>>");
        assert_eq!(&text[found[0].range.clone()], found[0].raw);
    }

    #[test]
    fn test_two_spans_on_one_line_are_distinct() {
        let text = format!(
            "{} and {}",
            MarkerSpan::with_id("x", "one").encode(),
            MarkerSpan::with_id("y", "two").encode()
        );

        let payloads: Vec<_> = find_markers(&text)
            .into_iter()
            .map(|f| f.marker.payload)
            .collect();

        assert_eq!(payloads, vec!["one", "two"]);
        assert_eq!(strip_markers(&text), "one and two");
    }

    #[test]
    fn test_mismatched_ids_are_not_markers() {
        let text = "<<B-x@@oops@@B-y-END>>";
        assert!(find_markers(text).is_empty());
        assert_eq!(strip_markers(text), text);
    }

    #[test]
    fn test_bold_to_markers_round_trips_through_strip() {
        let converted = bold_to_markers("Cut latency by **40%** using **caching**");

        assert_eq!(find_markers(&converted).len(), 2);
        assert_eq!(
            strip_markers(&converted),
            "Cut latency by 40% using caching"
        );
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        assert_ne!(MarkerSpan::new("a").id, MarkerSpan::new("a").id);
    }

    #[test]
    fn test_display_text() {
        let value = format!("**Lead** {}", MarkerSpan::with_id("q", "engineer").encode());
        assert_eq!(display_text(&value), "Lead engineer");
    }
}
