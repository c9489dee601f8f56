pub mod pipeline;
pub mod progress;

pub use pipeline::{PipelineConfig, ResolutionPipeline, NO_METHOD_SUCCEEDED};
pub use progress::{event_stream, ChannelLog, ProgressLog};
