use std::fmt;
use std::path::PathBuf;

/// One user-initiated download. Immutable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source_url: String,
    pub destination_root: PathBuf,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_root: destination_root.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMetadata {
    pub display_title: String,
}

/// Where a run writes its output: `<root>/<stem>/<stem>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub folder: PathBuf,
    pub stem: String,
}

impl Destination {
    pub fn file_with_extension(&self, extension: &str) -> PathBuf {
        self.folder.join(format!("{}.{}", self.stem, extension))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// A direct link the pipeline still has to download
    VideoUrl(String),
    /// The strategy wrote the file itself
    Saved(PathBuf),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Saved(PathBuf),
    Failed(String),
}

impl DownloadResult {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    ScriptScan,
    VideoElement,
    MediaExtractor,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptScan => write!(f, "script scan"),
            Self::VideoElement => write!(f, "video element scan"),
            Self::MediaExtractor => write!(f, "generic media extractor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Start,
    FetchingMetadata,
    Resolving(StrategyKind),
    Downloading,
    Saved,
    Failed,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Starting"),
            Self::FetchingMetadata => write!(f, "Fetching page"),
            Self::Resolving(kind) => write!(f, "Resolving ({})", kind),
            Self::Downloading => write!(f, "Downloading"),
            Self::Saved => write!(f, "Saved"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Progress reported from a running pipeline to whoever displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Phase(PipelinePhase),
    Log(String),
    Finished(DownloadResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_file_name() {
        let dest = Destination {
            folder: PathBuf::from("/tmp/Widget_1"),
            stem: "Widget_1".to_string(),
        };
        assert_eq!(
            dest.file_with_extension("mp4"),
            PathBuf::from("/tmp/Widget_1/Widget_1.mp4")
        );
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(
            PipelinePhase::Resolving(StrategyKind::VideoElement).to_string(),
            "Resolving (video element scan)"
        );
        assert_eq!(PipelinePhase::FetchingMetadata.to_string(), "Fetching page");
    }
}
