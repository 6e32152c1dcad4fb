use crate::editing::{EditRequest, OffsetDocument};
use crate::models::Section;
use crate::stages::{Stage, StageKind, Step};

/// Deletes blank and bar-only lines, one per batch, from the bottom up.
///
/// Candidate offsets are collected from the first snapshot only. Every later
/// decision relocates the candidate in the current snapshot by its recorded
/// start offset; deleting from the bottom up keeps the offsets of the
/// remaining candidates valid.
#[derive(Debug)]
pub struct EmptyLineSweeper {
    retained: Vec<Section>,
    /// Ascending start offsets; popped from the back
    candidates: Option<Vec<usize>>,
}

impl EmptyLineSweeper {
    pub fn new(retained: impl IntoIterator<Item = Section>) -> Self {
        Self {
            retained: retained.into_iter().collect(),
            candidates: None,
        }
    }

    fn is_retained_heading(&self, doc: &OffsetDocument, index: Option<usize>) -> bool {
        index
            .and_then(|i| doc.block(i))
            .and_then(|b| b.heading())
            .is_some_and(|s| self.retained.contains(&s))
    }

    /// True when the block at `index` sits directly above or below a retained heading
    pub fn borders_retained_heading(&self, doc: &OffsetDocument, index: usize) -> bool {
        self.is_retained_heading(doc, index.checked_sub(1))
            || self.is_retained_heading(doc, Some(index + 1))
    }
}

impl Stage for EmptyLineSweeper {
    fn kind(&self) -> StageKind {
        StageKind::EmptyLineSweeper
    }

    fn next(&mut self, doc: &OffsetDocument) -> Step {
        let mut candidates = self.candidates.take().unwrap_or_else(|| {
            let mut starts: Vec<usize> =
                doc.blocks.iter().filter_map(|b| b.span).map(|s| s.start).collect();
            starts.sort_unstable();
            log::debug!("{} sweep candidates", starts.len());
            starts
        });

        let mut step = Step::Done;
        while let Some(start) = candidates.pop() {
            let Some(index) = doc.block_starting_at(start) else {
                log::debug!("no block starts at {start} any more, skipping");
                continue;
            };
            let block = &doc.blocks[index];
            if !(block.is_blank() || block.is_bar()) {
                continue;
            }
            if self.borders_retained_heading(doc, index) {
                log::debug!("keeping line {index} next to a retained heading");
                continue;
            }
            let Some(span) = block.span.and_then(|s| doc.deletable(s)) else {
                continue;
            };
            log::debug!("sweeping line {index} at {span}");
            step = Step::Apply(vec![EditRequest::delete(span)]);
            break;
        }

        self.candidates = Some(candidates);
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Span;
    use crate::tests::snapshot_from_lines;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deletes_bottom_candidate_first() {
        // "a\n" [0,2) "\n" [2,3) "b\n" [3,5) " | \n" [5,9) "c\n" [9,11)
        let doc = snapshot_from_lines(&["a", "", "b", " | ", "c"]);
        let mut sweeper = EmptyLineSweeper::new([]);

        assert_eq!(
            sweeper.next(&doc),
            Step::Apply(vec![EditRequest::delete(Span::new(5, 9))])
        );

        let doc = snapshot_from_lines(&["a", "", "b", "c"]);
        assert_eq!(
            sweeper.next(&doc),
            Step::Apply(vec![EditRequest::delete(Span::new(2, 3))])
        );

        let doc = snapshot_from_lines(&["a", "b", "c"]);
        assert_eq!(sweeper.next(&doc), Step::Done);
    }

    #[test]
    fn test_keeps_lines_next_to_retained_headings() {
        let doc = snapshot_from_lines(&["Name", "", "EXPERIENCE", "|", "Acme", "", "PROJECTS"]);
        let mut sweeper = EmptyLineSweeper::new([Section::Experience]);

        // blank before PROJECTS (not retained) goes; the others border EXPERIENCE
        let Step::Apply(requests) = sweeper.next(&doc) else {
            panic!("expected a deletion");
        };
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].span(), doc.blocks[5].span);

        let doc = snapshot_from_lines(&["Name", "", "EXPERIENCE", "|", "Acme", "PROJECTS"]);
        assert_eq!(sweeper.next(&doc), Step::Done);
    }

    #[test]
    fn test_trailing_blank_line_keeps_final_newline() {
        // "a\n" [0,2) "\n" [2,3)
        let doc = snapshot_from_lines(&["a", ""]);
        let mut sweeper = EmptyLineSweeper::new([]);

        assert_eq!(
            sweeper.next(&doc),
            Step::Apply(vec![EditRequest::delete(Span::new(1, 2))])
        );
    }
}
