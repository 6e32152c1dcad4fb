//! Runs the stages in order against one document.
//!
//! The orchestrator is the only code that talks to the store during a run:
//! it reads a snapshot, asks the current stage for its next batch, applies
//! that batch tagged with the snapshot's revision, waits for the throttle
//! delay and reads again. Stages therefore never see offsets from a snapshot
//! older than the one they are planning against.

use std::thread;
use std::time::Duration;

use crate::editing::{Batch, DocumentId, OffsetDocument, Revision};
use crate::error::{PipelineError, StageError};
use crate::io::DocumentStore;
use crate::models::section::{absent, retained};
use crate::models::{FlattenedFields, ResumeRecord, Section, SectionDescriptor};
use crate::stages::styler::{DEFAULT_CHUNK_SIZE, DEFAULT_PASS_CEILING};
use crate::stages::{
    Anomaly, EmptyLineSweeper, MarkerStyler, PlaceholderResolver, RemovalMarkerCleanup,
    SectionPruner, SeparatorFixer, Stage, StageKind, Step,
};

pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);

/// Tunables for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Pause after every applied batch, to stay under remote rate limits
    pub batch_delay: Duration,
    pub marker_pass_ceiling: usize,
    pub style_chunk_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            batch_delay: DEFAULT_BATCH_DELAY,
            marker_pass_ceiling: DEFAULT_PASS_CEILING,
            style_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl PipelineOptions {
    /// Options without throttling, for in-memory stores
    pub fn unthrottled() -> Self {
        Self {
            batch_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Everything the stages need to know about the record, computed once
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInput {
    pub fields: FlattenedFields,
    pub sections: Vec<SectionDescriptor>,
}

impl PipelineInput {
    pub fn from_record(record: &ResumeRecord) -> Self {
        Self {
            fields: FlattenedFields::from_record(record),
            sections: SectionDescriptor::for_record(record),
        }
    }

    pub fn absent_sections(&self) -> Vec<Section> {
        absent(&self.sections)
    }

    pub fn retained_sections(&self) -> Vec<Section> {
        retained(&self.sections)
    }
}

/// How one stage went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: StageKind,
    /// Batches the store accepted
    pub batches: usize,
    /// False when a batch failed and the rest of the stage was abandoned
    pub completed: bool,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub document: DocumentId,
    /// Revision of the last snapshot read
    pub revision: Revision,
    pub stages: Vec<StageSummary>,
    pub anomalies: Vec<Anomaly>,
}

impl PipelineReport {
    pub fn batches(&self) -> usize {
        self.stages.iter().map(|s| s.batches).sum()
    }

    /// True when every stage ran to completion and nothing unusual was seen
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty() && self.stages.iter().all(|s| s.completed)
    }
}

pub struct Pipeline<S: DocumentStore> {
    store: S,
    options: PipelineOptions,
}

impl<S: DocumentStore> Pipeline<S> {
    pub fn new(store: S, options: PipelineOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run every stage, in order, against `document`
    pub fn run(
        &self,
        document: &DocumentId,
        input: &PipelineInput,
    ) -> Result<PipelineReport, PipelineError> {
        let mut stages: Vec<Box<dyn Stage + '_>> = vec![
            Box::new(SectionPruner::new(input.absent_sections())),
            Box::new(PlaceholderResolver::new(&input.fields)),
            Box::new(MarkerStyler::new(
                self.options.marker_pass_ceiling,
                self.options.style_chunk_size,
            )),
            Box::new(RemovalMarkerCleanup::new()),
            Box::new(EmptyLineSweeper::new(input.retained_sections())),
            Box::new(SeparatorFixer::new(input.fields.adjacent_pairs())),
        ];

        let mut summaries = Vec::with_capacity(stages.len());
        let mut anomalies = Vec::new();
        for stage in &mut stages {
            log::info!("starting stage {}", stage.kind());
            let summary = self.drive(document, stage.as_mut())?;
            log::info!(
                "stage {} finished after {} batches",
                summary.stage,
                summary.batches
            );
            anomalies.extend(stage.anomaly());
            summaries.push(summary);
        }

        let last = self.read(document)?;
        Ok(PipelineReport {
            document: document.clone(),
            revision: last.revision,
            stages: summaries,
            anomalies,
        })
    }

    fn drive(
        &self,
        document: &DocumentId,
        stage: &mut (dyn Stage + '_),
    ) -> Result<StageSummary, PipelineError> {
        let mut summary = StageSummary {
            stage: stage.kind(),
            batches: 0,
            completed: true,
        };

        loop {
            let snapshot = self.read(document)?;
            let requests = match stage.next(&snapshot) {
                Step::Done => break,
                Step::Apply(requests) if requests.is_empty() => {
                    log::debug!("{}: empty plan, nothing to apply", summary.stage);
                    break;
                }
                Step::Apply(requests) => requests,
            };

            let batch = Batch::new(snapshot.revision, requests);
            log::debug!(
                "{}: applying {} requests against revision {}",
                summary.stage,
                batch.len(),
                batch.base
            );
            if let Err(e) = self.store.batch_update(document, &batch) {
                let e = StageError::RemoteBatchFailure(e);
                log::warn!("abandoning stage {}: {e}", summary.stage);
                summary.completed = false;
                break;
            }
            summary.batches += 1;
            self.throttle();
        }
        Ok(summary)
    }

    fn read(&self, document: &DocumentId) -> Result<OffsetDocument, PipelineError> {
        self.store.get(document).map_err(|source| {
            log::error!("could not read {document}: {source}");
            PipelineError::Read {
                document: document.clone(),
                source,
            }
        })
    }

    fn throttle(&self) {
        if !self.options.batch_delay.is_zero() {
            thread::sleep(self.options.batch_delay);
        }
    }
}
