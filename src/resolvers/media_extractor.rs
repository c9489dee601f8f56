use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use super::traits::{ResolveContext, VideoResolver};
use crate::domain::{PipelineError, ResolutionOutcome, Result, StrategyKind};

/// Output template printed once the extractor has moved the file into place
const REPORT_TEMPLATE: &str = "after_move:%(.{filepath,ext,title})j";

/// Configuration for the external media extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Executable to run (`yt-dlp` on PATH by default)
    pub binary: String,
    /// Arguments placed before the generated ones, e.g. `["-m", "yt_dlp"]` for `python3`
    pub launcher_args: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            launcher_args: Vec::new(),
        }
    }
}

impl ExtractorConfig {
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_launcher_args(mut self, args: Vec<String>) -> Self {
        self.launcher_args = args;
        self
    }
}

/// Fields the extractor prints after saving
#[derive(Debug, Clone, Deserialize)]
struct ExtractorReport {
    filepath: Option<String>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Hands the page URL to a general-purpose media extractor which fetches,
/// discovers and writes the video itself.
#[derive(Debug, Clone, Default)]
pub struct MediaExtractorResolver {
    config: ExtractorConfig,
}

impl MediaExtractorResolver {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn command(&self, ctx: &ResolveContext<'_>) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        cmd.args(&self.config.launcher_args)
            .arg("--no-playlist")
            .arg("--no-progress")
            .arg("-P")
            .arg(&ctx.destination.folder)
            .arg("-o")
            .arg(format!("{}.%(ext)s", ctx.destination.stem))
            .arg("--print")
            .arg(REPORT_TEMPLATE)
            .arg("--")
            .arg(ctx.source_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Last parseable report line of the extractor's stdout.
fn parse_report(stdout: &str) -> Option<ExtractorReport> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str::<ExtractorReport>(line).ok())
}

#[async_trait]
impl VideoResolver for MediaExtractorResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MediaExtractor
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Result<ResolutionOutcome> {
        let output = self.command(ctx).output().await.map_err(|e| {
            PipelineError::Extractor(format!("{} could not be started: {}", self.config.binary, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no error output");
            warn!(status = ?output.status.code(), "media extractor failed");
            return Err(PipelineError::Extractor(format!(
                "{} exited with {:?}: {}",
                self.config.binary,
                output.status.code(),
                detail.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let report = parse_report(&stdout).ok_or_else(|| {
            PipelineError::Extractor("extractor did not report a saved file".to_string())
        })?;
        debug!(title = ?report.title, ext = ?report.ext, "extractor report");

        match report.filepath.map(PathBuf::from) {
            Some(path) if path.is_file() => Ok(ResolutionOutcome::Saved(path)),
            Some(path) => Err(PipelineError::Extractor(format!(
                "reported file {} does not exist",
                path.display()
            ))),
            None => Ok(ResolutionOutcome::NotFound),
        }
    }
}
