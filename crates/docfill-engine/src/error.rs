use crate::editing::DocumentId;
use crate::io::{AuthError, StoreError};

/// Problems affecting one unit of work inside a stage.
///
/// None of these stop the pipeline: the unit is logged and skipped, or for
/// `RemoteBatchFailure` the rest of the stage is abandoned.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("not found in current snapshot: {0}")]
    NotFound(String),

    #[error("block {index} has no readable offsets")]
    InvalidRange { index: usize },

    #[error("batch was not applied: {0}")]
    RemoteBatchFailure(#[source] StoreError),
}

/// Errors that end a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("authentication failed: {0}")]
    AuthFailure(#[from] AuthError),

    #[error("failed to read document {document}: {source}")]
    Read {
        document: DocumentId,
        source: StoreError,
    },

    #[error("failed to copy template {template}: {source}")]
    Copy {
        template: DocumentId,
        source: StoreError,
    },

    #[error("failed to share document {document}: {source}")]
    Share {
        document: DocumentId,
        source: StoreError,
    },
}
