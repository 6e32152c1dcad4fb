use crate::editing::{EditRequest, OffsetDocument, REMOVAL_MARKER, Span, merge_spans};
use crate::stages::{Stage, StageKind, Step};

/// Deletes every line that received the removal marker.
///
/// Touching lines are merged into a single range before the end-of-document
/// adjustment, and the deletions are issued from the highest offset down so
/// each range is still valid when it is applied.
#[derive(Debug, Default)]
pub struct RemovalMarkerCleanup {
    done: bool,
}

impl RemovalMarkerCleanup {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Descending deletion ranges for the blocks carrying the removal marker
pub fn marked_ranges(doc: &OffsetDocument) -> Vec<Span> {
    let spans: Vec<Span> = doc
        .blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.text.contains(REMOVAL_MARKER))
        .filter_map(|(i, b)| match b.span(i) {
            Ok(span) => Some(span),
            Err(e) => {
                log::warn!("cannot remove marked line: {e}");
                None
            }
        })
        .collect();

    let mut ranges: Vec<Span> = merge_spans(spans)
        .into_iter()
        .filter_map(|span| doc.deletable(span))
        .collect();
    ranges.sort_by(|a, b| b.start.cmp(&a.start));
    ranges
}

impl Stage for RemovalMarkerCleanup {
    fn kind(&self) -> StageKind {
        StageKind::RemovalMarkerCleanup
    }

    fn next(&mut self, doc: &OffsetDocument) -> Step {
        if self.done {
            return Step::Done;
        }
        self.done = true;

        let ranges = marked_ranges(doc);
        if ranges.is_empty() {
            return Step::Done;
        }
        log::info!("removing {} marked line ranges", ranges.len());
        Step::Apply(ranges.into_iter().map(EditRequest::delete).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::snapshot_from_lines;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ranges_are_merged_and_descending() {
        let marked = format!("- {REMOVAL_MARKER}");
        // "a\n" [0,2) marked [2,2+m) marked ... "b\n" then marked last
        let doc = snapshot_from_lines(&["a", &marked, &marked, "b", &marked]);
        let m = marked.len() + 1;
        let first = Span::new(2, 2 + 2 * m);
        let last_start = first.end + 2;
        let end = last_start + m;

        assert_eq!(
            marked_ranges(&doc),
            vec![Span::new(last_start - 1, end - 1), first]
        );
    }

    #[test]
    fn test_one_shot() {
        let marked = REMOVAL_MARKER.to_string();
        let doc = snapshot_from_lines(&["keep", &marked, "keep"]);
        let mut cleanup = RemovalMarkerCleanup::new();

        assert_eq!(
            cleanup.next(&doc),
            Step::Apply(vec![EditRequest::delete(Span::new(5, 5 + marked.len() + 1))])
        );
        assert_eq!(cleanup.next(&doc), Step::Done);
    }

    #[test]
    fn test_nothing_marked() {
        let doc = snapshot_from_lines(&["keep"]);
        assert_eq!(RemovalMarkerCleanup::new().next(&doc), Step::Done);
    }
}
