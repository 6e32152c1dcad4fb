use crate::editing::markers::{find_markers, first_marker};
use crate::editing::{EditRequest, OffsetDocument, Span};
use crate::stages::{Anomaly, Stage, StageKind, Step};

pub const DEFAULT_PASS_CEILING: usize = 50;
pub const DEFAULT_CHUNK_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    /// Looking for the next marker span to unwrap
    Strip,
    /// Bolding occurrences of the payload just unwrapped
    Style { payload: String, rounds: usize },
}

/// Unwraps marker spans one at a time and bolds their payload.
///
/// Each pass replaces the first well-formed span with its bare payload, then
/// bolds every unstyled occurrence of that payload in chunks. A chunk is
/// planned against the snapshot it is applied to, and already-bold runs are
/// never planned again, so the styling rounds converge. Identical text
/// elsewhere in the document is bolded too.
#[derive(Debug)]
pub struct MarkerStyler {
    ceiling: usize,
    chunk_size: usize,
    passes: usize,
    phase: Phase,
    anomaly: Option<Anomaly>,
}

impl Default for MarkerStyler {
    fn default() -> Self {
        Self::new(DEFAULT_PASS_CEILING, DEFAULT_CHUNK_SIZE)
    }
}

impl MarkerStyler {
    pub fn new(ceiling: usize, chunk_size: usize) -> Self {
        Self {
            ceiling,
            chunk_size: chunk_size.max(1),
            passes: 0,
            phase: Phase::Strip,
            anomaly: None,
        }
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    fn strip(&mut self, doc: &OffsetDocument) -> Step {
        let Some(found) = doc.blocks.iter().find_map(|b| first_marker(&b.text)) else {
            log::info!("no marker spans left after {} passes", self.passes);
            return Step::Done;
        };

        if self.passes >= self.ceiling {
            let remaining: usize = doc.blocks.iter().map(|b| find_markers(&b.text).len()).sum();
            log::warn!(
                "marker pass ceiling of {} reached with {remaining} spans left",
                self.ceiling
            );
            self.anomaly = Some(Anomaly::MarkerCeilingReached {
                passes: self.passes,
                remaining,
            });
            return Step::Done;
        }

        self.passes += 1;
        log::debug!("pass {}: unwrapping marker {}", self.passes, found.marker.id);
        let payload = found.marker.payload.clone();
        self.phase = Phase::Style {
            payload: payload.clone(),
            rounds: 0,
        };
        Step::Apply(vec![EditRequest::replace(found.raw, payload)])
    }
}

/// Offsets of payload occurrences inside runs that are not yet bold.
///
/// Occurrences are non-overlapping within a run and never cross run
/// boundaries.
pub fn unstyled_occurrences(doc: &OffsetDocument, payload: &str) -> Vec<Span> {
    if payload.is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    for run in doc.blocks.iter().flat_map(|b| &b.runs) {
        if run.bold {
            continue;
        }
        let Some(run_span) = run.span else {
            continue;
        };
        for (at, matched) in run.text.match_indices(payload) {
            let start = run_span.start + doc.unit.measure(&run.text[..at]);
            spans.push(Span::new(start, start + doc.unit.measure(matched)));
        }
    }
    spans
}

impl Stage for MarkerStyler {
    fn kind(&self) -> StageKind {
        StageKind::MarkerStyler
    }

    fn next(&mut self, doc: &OffsetDocument) -> Step {
        loop {
            match &mut self.phase {
                Phase::Strip => return self.strip(doc),
                Phase::Style { payload, rounds } => {
                    let pending = unstyled_occurrences(doc, payload);
                    if pending.is_empty() || *rounds >= self.ceiling {
                        if !pending.is_empty() {
                            log::warn!(
                                "giving up on bolding {payload:?} with {} occurrences left",
                                pending.len()
                            );
                        }
                        self.phase = Phase::Strip;
                        continue;
                    }
                    *rounds += 1;
                    let chunk: Vec<EditRequest> = pending
                        .into_iter()
                        .take(self.chunk_size)
                        .map(EditRequest::bold)
                        .collect();
                    log::debug!("bolding {} occurrences of {payload:?}", chunk.len());
                    return Step::Apply(chunk);
                }
            }
        }
    }

    fn anomaly(&self) -> Option<Anomaly> {
        self.anomaly.clone()
    }
}
