//! Document stores the pipeline reads from and writes to.
//!
//! The pipeline only ever needs two calls: read a full snapshot and apply one
//! batch. Copying a template and sharing the result live behind a separate
//! trait because they are not part of the edit loop.

pub mod auth;
pub mod google;
pub mod local;

use crate::editing::{Batch, DocumentId, OffsetDocument, Revision, Span};

pub use auth::{AccessToken, AuthError, DeploymentMode, acquire_token};
pub use google::{GoogleDocsStore, GoogleDrive};
pub use local::LocalStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("document not found: {0}")]
    UnknownDocument(DocumentId),

    #[error("batch computed against revision {expected} but document is at {actual}")]
    StaleRevision { expected: Revision, actual: Revision },

    #[error("range {span} is outside the document (length {len})")]
    InvalidRange { span: Span, len: usize },
}

/// Read and batch-edit access to offset-addressed documents
pub trait DocumentStore {
    /// Full snapshot reflecting every previously applied batch
    fn get(&self, id: &DocumentId) -> Result<OffsetDocument, StoreError>;

    /// Apply all requests of `batch` as one atomic transaction
    fn batch_update(&self, id: &DocumentId, batch: &Batch) -> Result<(), StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn get(&self, id: &DocumentId) -> Result<OffsetDocument, StoreError> {
        (**self).get(id)
    }

    fn batch_update(&self, id: &DocumentId, batch: &Batch) -> Result<(), StoreError> {
        (**self).batch_update(id, batch)
    }
}

/// Permission granted when sharing a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Writer,
    Commenter,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Writer => "writer",
            Role::Commenter => "commenter",
        }
    }
}

/// File-level operations around a pipeline run
pub trait DocumentFiles {
    /// Duplicate `template` under a new title, returning the new document's id
    fn copy(&self, template: &DocumentId, title: &str) -> Result<DocumentId, StoreError>;

    /// Grant `principal` (an email address) `role` on `document`
    fn share(&self, document: &DocumentId, principal: &str, role: Role) -> Result<(), StoreError>;

    /// Where a reader can open `document`
    fn location(&self, document: &DocumentId) -> String;
}
