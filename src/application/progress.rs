use std::sync::Arc;

use futures::channel::mpsc::{self, UnboundedSender};
use futures::{future, stream, stream::BoxStream, StreamExt};

use super::pipeline::ResolutionPipeline;
use crate::domain::{DownloadRequest, DownloadResult, PipelineEvent, PipelinePhase};

/// Receives the human-readable progress of a pipeline run.
pub trait ProgressLog: Send + Sync {
    fn log(&self, line: &str);

    fn phase(&self, _phase: PipelinePhase) {}
}

/// Forwards progress into a channel as [`PipelineEvent`]s.
#[derive(Clone)]
pub struct ChannelLog {
    sender: UnboundedSender<PipelineEvent>,
}

impl ChannelLog {
    pub fn new(sender: UnboundedSender<PipelineEvent>) -> Self {
        Self { sender }
    }

    pub fn finish(&self, result: DownloadResult) {
        // The receiver only goes away when the window does
        let _ = self.sender.unbounded_send(PipelineEvent::Finished(result));
    }
}

impl ProgressLog for ChannelLog {
    fn log(&self, line: &str) {
        let _ = self.sender.unbounded_send(PipelineEvent::Log(line.to_string()));
    }

    fn phase(&self, phase: PipelinePhase) {
        let _ = self.sender.unbounded_send(PipelineEvent::Phase(phase));
    }
}

/// Run the pipeline and surface its progress as a stream.
/// Events arrive in emission order; `Finished` is always last.
pub fn event_stream(
    pipeline: Arc<ResolutionPipeline>,
    request: DownloadRequest,
) -> BoxStream<'static, PipelineEvent> {
    let (sender, receiver) = mpsc::unbounded();

    let run = async move {
        let log = ChannelLog::new(sender);
        let result = pipeline.process(&request, &log).await;
        log.finish(result);
    };

    // Drives the run; it yields nothing itself
    let driver = stream::once(run).filter_map(|()| future::ready(None::<PipelineEvent>));

    stream::select(receiver, driver).boxed()
}
