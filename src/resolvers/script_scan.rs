use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::traits::{ResolveContext, VideoResolver};
use crate::domain::{ResolutionOutcome, Result, StrategyKind};
use crate::utils::unescape_json_string;

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("valid script selector"));

// Matches "videoUrl":"..." and keeps escaped quotes inside the value
static VIDEO_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""videoUrl"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid videoUrl pattern")
});

/// Scans the inline scripts of the already fetched page for a `videoUrl` key.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptScanResolver;

impl ScriptScanResolver {
    pub fn new() -> Self {
        Self
    }
}

/// First non-empty `videoUrl` value found in the page's script blocks, in document order.
pub fn find_video_url(html: &str) -> ResolutionOutcome {
    let document = Html::parse_document(html);

    for script in document.select(&SCRIPT_SELECTOR) {
        let body = script.text().collect::<String>();
        if !body.contains("videoUrl") {
            continue;
        }

        let found = VIDEO_URL_PATTERN
            .captures_iter(&body)
            .map(|caps| unescape_json_string(&caps[1]))
            .find(|url| !url.is_empty());

        if let Some(url) = found {
            return ResolutionOutcome::VideoUrl(url);
        }
    }

    ResolutionOutcome::NotFound
}

#[async_trait]
impl VideoResolver for ScriptScanResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ScriptScan
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Result<ResolutionOutcome> {
        Ok(match ctx.page_html {
            Some(html) => find_video_url(html),
            None => ResolutionOutcome::NotFound,
        })
    }
}
