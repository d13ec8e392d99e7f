//! The crate's single error boundary.
//!
//! Mirrors `normalize-surface-syntax::traits::ReadError` in shape but
//! collapses to the one exceptional kind spec.md §7 allows: unsupported
//! syntax is never an error, it is rendered in-band as `ir::Node::Unknown`.

/// Failure surfaced to callers of [`crate::transpile`].
///
/// This is the crate's only error kind. It is terminal: no partial output is
/// produced, and the original diagnostic is preserved verbatim.
#[derive(Debug, thiserror::Error)]
pub enum TranspileError {
    /// The front end rejected the input, or produced no usable root.
    #[error("failed to parse source: {0}")]
    ParseFailure(String),

    /// The output path could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
