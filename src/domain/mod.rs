pub mod error;
pub mod model;

pub use error::{PipelineError, Result};
pub use model::{
    Destination, DownloadRequest, DownloadResult, PipelineEvent, PipelinePhase, ProductMetadata,
    ResolutionOutcome, StrategyKind,
};
