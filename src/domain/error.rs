use thiserror::Error;

use crate::api::ApiError;

/// Hard failures of a strategy or the pipeline.
///
/// A page without the pattern a strategy looks for is not an error: it
/// comes back as `ResolutionOutcome::NotFound`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Network error: {0}")]
    Network(#[from] ApiError),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Extractor error: {0}")]
    Extractor(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
