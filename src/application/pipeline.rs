use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::progress::ProgressLog;
use crate::{
    api::PageClient,
    domain::{
        Destination, DownloadRequest, DownloadResult, PipelinePhase, ProductMetadata,
        ResolutionOutcome, Result,
    },
    resolvers::{
        ExtractorConfig, MediaExtractorResolver, ResolveContext, ScriptScanResolver,
        VideoElementResolver, VideoResolver,
    },
    utils::{extract_title, sanitize_title},
};

pub const NO_METHOD_SUCCEEDED: &str = "no video found / no method succeeded";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Title used when the page cannot be fetched or has none
    pub default_title: String,
    /// Extension for videos the pipeline downloads itself
    pub video_extension: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_title: "alibaba_product".to_string(),
            video_extension: "mp4".to_string(),
        }
    }
}

/// Fetches a product page, walks the strategies in priority order and saves
/// the first video one of them can deliver.
pub struct ResolutionPipeline {
    client: PageClient,
    config: PipelineConfig,
    strategies: Vec<Box<dyn VideoResolver>>,
}

impl ResolutionPipeline {
    pub fn new(
        client: PageClient,
        config: PipelineConfig,
        strategies: Vec<Box<dyn VideoResolver>>,
    ) -> Self {
        Self {
            client,
            config,
            strategies,
        }
    }

    /// Script scan, then video element scan, then the external extractor.
    pub fn with_default_strategies(
        client: PageClient,
        config: PipelineConfig,
        extractor: ExtractorConfig,
    ) -> Self {
        let strategies: Vec<Box<dyn VideoResolver>> = vec![
            Box::new(ScriptScanResolver::new()),
            Box::new(VideoElementResolver::new(client.clone())),
            Box::new(MediaExtractorResolver::new(extractor)),
        ];
        Self::new(client, config, strategies)
    }

    pub fn strategies(&self) -> impl Iterator<Item = &dyn VideoResolver> {
        self.strategies.iter().map(|s| s.as_ref())
    }

    pub async fn process(&self, request: &DownloadRequest, log: &dyn ProgressLog) -> DownloadResult {
        log.phase(PipelinePhase::Start);
        info!(url = %request.source_url, root = %request.destination_root.display(), "download requested");
        log.log(&format!("Starting download from: {}", request.source_url));

        log.phase(PipelinePhase::FetchingMetadata);
        let page_html = match self.client.fetch_page(&request.source_url).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!(url = %request.source_url, error = %e, "metadata fetch failed");
                log.log(&format!(
                    "Could not read product page ({}), using default title '{}'",
                    e, self.config.default_title
                ));
                None
            }
        };

        let metadata = self.read_metadata(page_html.as_deref());
        let destination = match self.prepare_destination(request, &metadata).await {
            Ok(destination) => destination,
            Err(e) => {
                warn!(error = %e, "destination folder could not be created");
                log.log(&format!("Could not create destination folder: {}", e));
                return self.fail(log);
            }
        };
        log.log(&format!("Folder created: {}", destination.folder.display()));

        let ctx = ResolveContext {
            source_url: &request.source_url,
            page_html: page_html.as_deref(),
            destination: &destination,
        };

        for (index, strategy) in self.strategies.iter().enumerate() {
            let kind = strategy.kind();
            log.phase(PipelinePhase::Resolving(kind));
            log.log(&format!("Trying strategy {}: {}", index + 1, kind));

            let outcome = match strategy.try_resolve(&ctx).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(strategy = %kind, error = %e, "strategy failed");
                    log.log(&format!("Strategy {} failed: {}", kind, e));
                    continue;
                }
            };

            match outcome {
                ResolutionOutcome::VideoUrl(video_url) => {
                    info!(strategy = %kind, video_url = %video_url, "video url resolved");
                    log.log(&format!("Video URL found: {}", video_url));
                    log.phase(PipelinePhase::Downloading);

                    let target = destination.file_with_extension(&self.config.video_extension);
                    match self.download_to(&video_url, &target).await {
                        Ok(bytes) => {
                            debug!(path = %target.display(), bytes, "video written");
                            log.log(&format!("Video downloaded: {}", target.display()));
                            return self.succeed(target, &destination, log);
                        }
                        Err(e) => {
                            warn!(strategy = %kind, error = %e, "video download failed");
                            log.log(&format!("Download failed: {}", e));
                        }
                    }
                }
                ResolutionOutcome::Saved(path) => {
                    info!(strategy = %kind, path = %path.display(), "video saved by strategy");
                    log.log(&format!("Video downloaded: {}", path.display()));
                    return self.succeed(path, &destination, log);
                }
                ResolutionOutcome::NotFound => {
                    debug!(strategy = %kind, "no video");
                    log.log(&format!("No video found by {}", kind));
                }
            }
        }

        log.log("No video found to download.");
        self.fail(log)
    }

    fn read_metadata(&self, page_html: Option<&str>) -> ProductMetadata {
        let display_title = page_html
            .and_then(extract_title)
            .unwrap_or_else(|| self.config.default_title.clone());
        ProductMetadata { display_title }
    }

    fn folder_stem(&self, metadata: &ProductMetadata) -> String {
        let stem = sanitize_title(&metadata.display_title);
        // "." and ".." would point outside the chosen folder
        if stem.trim_matches('.').is_empty() {
            sanitize_title(&self.config.default_title)
        } else {
            stem
        }
    }

    async fn prepare_destination(
        &self,
        request: &DownloadRequest,
        metadata: &ProductMetadata,
    ) -> Result<Destination> {
        let stem = self.folder_stem(metadata);
        let folder = request.destination_root.join(&stem);
        tokio::fs::create_dir_all(&folder).await?;
        Ok(Destination { folder, stem })
    }

    /// Download into `path`, removing whatever was written if anything fails.
    async fn download_to(&self, url: &str, path: &Path) -> Result<u64> {
        let result = self.write_stream(url, path).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(path).await;
        }
        result
    }

    async fn write_stream(&self, url: &str, path: &Path) -> Result<u64> {
        let (total, stream) = self.client.download_file_stream(url).await?;
        let mut stream = stream.boxed();
        let mut file = tokio::fs::File::create(path).await?;
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }

        file.sync_all().await?;
        debug!(downloaded, ?total, "stream finished");
        Ok(downloaded)
    }

    fn succeed(
        &self,
        path: PathBuf,
        destination: &Destination,
        log: &dyn ProgressLog,
    ) -> DownloadResult {
        log.phase(PipelinePhase::Saved);
        log.log(&format!(
            "Download completed. Content saved in: {}",
            destination.folder.display()
        ));
        DownloadResult::Saved(path)
    }

    fn fail(&self, log: &dyn ProgressLog) -> DownloadResult {
        log.phase(PipelinePhase::Failed);
        log.log(&format!("Download failed: {}", NO_METHOD_SUCCEEDED));
        DownloadResult::Failed(NO_METHOD_SUCCEEDED.to_string())
    }
}
