//! Pipeline stages.
//!
//! A stage never talks to the store. The pipeline hands it a fresh snapshot
//! and the stage answers with the next set of requests, expressed against
//! that snapshot's offsets, or says it is finished. Stages that need several
//! round trips keep their progress in their own state between calls.

pub mod cleanup;
pub mod placeholders;
pub mod sections;
pub mod separators;
pub mod styler;
pub mod sweep;

pub use cleanup::RemovalMarkerCleanup;
pub use placeholders::PlaceholderResolver;
pub use sections::SectionPruner;
pub use separators::SeparatorFixer;
pub use styler::MarkerStyler;
pub use sweep::EmptyLineSweeper;

use crate::editing::{EditRequest, OffsetDocument};

/// What a stage wants done next
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Apply these requests as one batch, then call again with a fresh snapshot
    Apply(Vec<EditRequest>),
    /// Nothing left to do
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    SectionPruner,
    PlaceholderResolver,
    MarkerStyler,
    RemovalMarkerCleanup,
    EmptyLineSweeper,
    SeparatorFixer,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StageKind::SectionPruner => "section-pruner",
            StageKind::PlaceholderResolver => "placeholder-resolver",
            StageKind::MarkerStyler => "marker-styler",
            StageKind::RemovalMarkerCleanup => "removal-marker-cleanup",
            StageKind::EmptyLineSweeper => "empty-line-sweeper",
            StageKind::SeparatorFixer => "separator-fixer",
        };
        f.write_str(name)
    }
}

/// Something a stage finished with that the caller should know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// The marker styler hit its pass ceiling with spans still in the document,
    /// which points at malformed or nested markers
    MarkerCeilingReached { passes: usize, remaining: usize },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::MarkerCeilingReached { passes, remaining } => write!(
                f,
                "marker styler stopped after {passes} passes with {remaining} marker spans left"
            ),
        }
    }
}

pub trait Stage {
    fn kind(&self) -> StageKind;

    /// Plan the next batch against `doc`
    fn next(&mut self, doc: &OffsetDocument) -> Step;

    fn anomaly(&self) -> Option<Anomaly> {
        None
    }
}
