use iced::{
    widget::{button, column, row, scrollable, text, text_input},
    Alignment, Element, Length,
};

use crate::domain::PipelinePhase;

/// Main view state
pub struct DownloadView {
    pub source_url: String,
    pub destination: String,
    pub phase: Option<PipelinePhase>,
    pub log_lines: Vec<String>,
    pub is_downloading: bool,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            destination: String::new(),
            phase: None,
            log_lines: Vec::new(),
            is_downloading: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    SourceUrlChanged(String),
    DestinationChanged(String),
    BrowsePressed,
    DownloadPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::SourceUrlChanged(url) => {
                self.source_url = url;
            }
            DownloadMessage::DestinationChanged(path) => {
                self.destination = path;
            }
            DownloadMessage::BrowsePressed | DownloadMessage::DownloadPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log_lines.push(line.into());
    }

    /// Both fields filled in, ignoring surrounding whitespace
    pub fn has_inputs(&self) -> bool {
        !self.source_url.trim().is_empty() && !self.destination.trim().is_empty()
    }

    fn status_line(&self) -> String {
        match self.phase {
            Some(phase) => format!("Status: {}", phase),
            None => "Enter a product URL and a destination folder".to_string(),
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let idle = !self.is_downloading;

        let url_row = row![
            text("Product URL:").width(Length::Fixed(140.0)),
            text_input("https://...", &self.source_url)
                .on_input_maybe(idle.then_some(DownloadMessage::SourceUrlChanged))
                .padding(8),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let folder_row = row![
            text("Destination folder:").width(Length::Fixed(140.0)),
            text_input("Choose a folder...", &self.destination)
                .on_input_maybe(idle.then_some(DownloadMessage::DestinationChanged))
                .padding(8),
            button("Select")
                .on_press_maybe(idle.then_some(DownloadMessage::BrowsePressed))
                .padding([8, 16]),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let log = scrollable(text(self.log_lines.join("\n")).size(14))
            .anchor_bottom()
            .height(Length::Fill)
            .width(Length::Fill);

        column![
            url_row,
            folder_row,
            button("Download")
                .on_press_maybe(idle.then_some(DownloadMessage::DownloadPressed))
                .padding([10, 20]),
            text(self.status_line()).size(14),
            log,
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
