mod api;
mod app;
mod application;
mod domain;
mod resolvers;
mod ui;
mod utils;

use iced::window;
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("product_video_downloader=info")),
        )
        .init();

    tracing::info!("starting Product Video Downloader");

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("Product Video Downloader")
        .window(window::Settings {
            size: iced::Size::new(666.0, 400.0),
            ..Default::default()
        })
        .run()
}
