use std::collections::VecDeque;

use crate::editing::{EditRequest, OffsetDocument, Span};
use crate::error::StageError;
use crate::models::Section;
use crate::stages::{Stage, StageKind, Step};

/// Deletes whole sections whose backing data is absent.
///
/// A section runs from its heading up to (not including) the next block that
/// is any other declared heading, or to the end of the document. One section
/// is removed per batch because each deletion shifts every later offset.
#[derive(Debug)]
pub struct SectionPruner {
    pending: VecDeque<Section>,
}

impl SectionPruner {
    pub fn new(absent: impl IntoIterator<Item = Section>) -> Self {
        Self {
            pending: absent.into_iter().collect(),
        }
    }
}

/// Range covering `section`'s heading and body in `doc`
pub fn section_extent(doc: &OffsetDocument, section: Section) -> Result<Span, StageError> {
    let heading = doc
        .find_heading(section, 0)
        .ok_or_else(|| StageError::NotFound(format!("heading {section}")))?;
    let start = doc.blocks[heading].span(heading)?.start;

    let last = match doc.find_other_heading(section, heading + 1) {
        Some(boundary) => boundary - 1,
        None => doc.blocks.len() - 1,
    };
    let end = (heading..=last)
        .rev()
        .find_map(|i| doc.blocks[i].span)
        .map(|span| span.end)
        .ok_or(StageError::InvalidRange { index: heading })?;

    doc.deletable(Span::new(start, end))
        .ok_or_else(|| StageError::NotFound(format!("deletable range for {section}")))
}

impl Stage for SectionPruner {
    fn kind(&self) -> StageKind {
        StageKind::SectionPruner
    }

    fn next(&mut self, doc: &OffsetDocument) -> Step {
        while let Some(section) = self.pending.pop_front() {
            match section_extent(doc, section) {
                Ok(span) => {
                    log::info!("removing section {section} at {span}");
                    return Step::Apply(vec![EditRequest::delete(span)]);
                }
                Err(StageError::NotFound(what)) => {
                    log::info!("section {section} not in document ({what} not found), nothing to remove");
                }
                Err(e) => log::warn!("skipping removal of section {section}: {e}"),
            }
        }
        Step::Done
    }
}
