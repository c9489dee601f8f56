use crate::api::{ClientConfig, PageClient};
use crate::application::{event_stream, PipelineConfig, ResolutionPipeline};
use crate::domain::{DownloadRequest, DownloadResult, PipelineEvent};
use crate::resolvers::ExtractorConfig;
use crate::ui::{DownloadMessage, DownloadView};
use futures::StreamExt;
use iced::Task;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const MISSING_INPUT: &str = "Please enter the URL and select a destination folder.";

pub struct DownloadApp {
    view: DownloadView,
    pipeline: Arc<ResolutionPipeline>,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        let pipeline = ResolutionPipeline::with_default_strategies(
            PageClient::new(ClientConfig::default()),
            PipelineConfig::default(),
            ExtractorConfig::default(),
        );

        Self {
            view: DownloadView::default(),
            pipeline: Arc::new(pipeline),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    FolderSelected(Option<PathBuf>),
    Pipeline(PipelineEvent),
    NoticeClosed,
}

enum Notice {
    Saved(PathBuf),
    Error(String),
}

async fn show_notice(notice: Notice) {
    let (level, title, description) = match notice {
        Notice::Saved(path) => (
            rfd::MessageLevel::Info,
            "Download completed",
            format!("Content downloaded to:\n{}", path.display()),
        ),
        Notice::Error(reason) => (rfd::MessageLevel::Error, "Error", reason),
    };

    rfd::AsyncMessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok)
        .show()
        .await;
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::BrowsePressed => {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .pick_folder()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::FolderSelected,
                    );
                }
                DownloadMessage::DownloadPressed if !app.view.is_downloading => {
                    if !app.view.has_inputs() {
                        app.view.push_log(format!("Error: {}", MISSING_INPUT));
                        return Task::perform(
                            show_notice(Notice::Error(MISSING_INPUT.to_string())),
                            |_| Message::NoticeClosed,
                        );
                    }

                    let request = DownloadRequest::new(
                        app.view.source_url.trim(),
                        PathBuf::from(app.view.destination.trim()),
                    );
                    info!(url = %request.source_url, "starting pipeline");
                    app.view.is_downloading = true;

                    // Runs on the tokio executor so the window keeps drawing
                    return Task::stream(
                        event_stream(app.pipeline.clone(), request).map(Message::Pipeline),
                    );
                }
                _ => {}
            }
        }
        Message::FolderSelected(folder) => {
            // None means the user closed the picker
            if let Some(folder) = folder {
                app.view.destination = folder.display().to_string();
            }
        }
        Message::Pipeline(event) => match event {
            PipelineEvent::Phase(phase) => {
                app.view.phase = Some(phase);
            }
            PipelineEvent::Log(line) => {
                app.view.push_log(line);
            }
            PipelineEvent::Finished(result) => {
                app.view.is_downloading = false;
                info!(saved = result.is_saved(), "pipeline finished");
                let notice = match result {
                    DownloadResult::Saved(path) => Notice::Saved(path),
                    DownloadResult::Failed(reason) => Notice::Error(reason),
                };
                return Task::perform(show_notice(notice), |_| Message::NoticeClosed);
            }
        },
        Message::NoticeClosed => {}
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
