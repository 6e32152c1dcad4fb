pub mod editing;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;
pub mod workflow;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Batch, DocumentId, EditRequest, OffsetDocument, Revision, Span};
pub use error::{PipelineError, StageError};
pub use io::*;
pub use models::{FlattenedFields, ResumeRecord, Section, SectionDescriptor};
pub use pipeline::{Pipeline, PipelineInput, PipelineOptions, PipelineReport, StageSummary};
pub use stages::{Anomaly, StageKind};
pub use workflow::{GenerateRequest, Generated, generate, title_for};
