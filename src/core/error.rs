use thiserror::Error;

/// Errors surfaced to callers of the processing pipeline.
///
/// Per-document faults are contained inside the batch loop — a malformed
/// document is logged and skipped, an absent field resolves to its default —
/// so only batch-level conditions appear here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotaError {
    /// The input is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// The batch contained no documents at all.
    #[error("no XML documents to process")]
    EmptyBatch,
}
