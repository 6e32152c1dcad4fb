/*!
 * # Editing Model
 *
 * Types shared by every stage of the pipeline: the read-only document
 * snapshot and the edit requests computed against it.
 *
 * ## Architecture Overview
 *
 * ### 1. Snapshots, not live documents
 * - The remote document is read in full as an **`OffsetDocument`**: ordered
 *   **`Block`**s with absolute, half-open offsets and their text runs
 * - Each snapshot carries the **`Revision`** it was read at
 * - A snapshot is never patched locally; after any edit the pipeline reads a
 *   fresh one
 *
 * ### 2. Request-based editing
 * - All edits are **`EditRequest`**s: replace text, delete a range, or apply
 *   a style to a range
 * - Requests travel in a **`Batch`** that names the revision its offsets
 *   refer to, so offsets from two snapshots are never mixed
 * - Multiple deletions inside one batch go from the highest offset down
 *
 * ### 3. Markers
 * - Field values may carry **marker spans** (text to bold) and the
 *   **removal marker** (line to drop); see [`markers`]
 *
 * ## Module Structure
 *
 * - **`span`**: `Span` offset ranges
 * - **`document`**: `OffsetDocument`, `Block`, `TextRun`, `Revision`, `OffsetUnit`
 * - **`request`**: `EditRequest`, `TextStyle`, `Batch`
 * - **`markers`**: marker span encoding and detection
 */

pub mod document;
pub mod markers;
pub mod request;
pub mod span;

pub use document::{
    Block, DocumentId, OffsetDocument, OffsetUnit, Revision, TextRun, normalize_heading,
};
pub use markers::{MarkerSpan, REMOVAL_MARKER};
pub use request::{Batch, EditRequest, TextStyle};
pub use span::{Span, merge_spans};
