//! Error taxonomy (§7). Parse-failure and Unknown-name are deliberately
//! absent here: the former is per-location and non-fatal (reported through
//! [`crate::bundle::Logger`] as a [`crate::bundle::ParseDiagnostic`]), the
//! latter is plain evaluator behaviour (§4.7), not a `Result` at all.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("bundle not found: {0}")]
    BundleMissing(PathBuf),
    #[error("bundle has no JSON tables and no runnable helper")]
    BundleEmpty,
    #[error("helper process failed: {0}")]
    HelperFailure(String),
    #[error("bundle archive is corrupt: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("malformed JSON in {table}: {source}")]
    Json {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error reading bundle: {0}")]
    Io(#[from] std::io::Error),
}
