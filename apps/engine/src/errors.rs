use thiserror::Error;

/// Caller-visible pipeline error.
///
/// Everything downstream of input validation degrades to empty-default data
/// instead of failing, so this enum stays small: a run either rejects its
/// inputs up front or returns a best-effort report.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),
}
