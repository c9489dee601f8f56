use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use super::traits::{ResolveContext, VideoResolver};
use crate::api::PageClient;
use crate::domain::{ResolutionOutcome, Result, StrategyKind};

static VIDEO_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("video[src], video source[src]").expect("valid video selector")
});

/// Re-fetches the page on its own client and reads the `src` of the first `<video>`.
#[derive(Clone, Default)]
pub struct VideoElementResolver {
    client: PageClient,
}

impl VideoElementResolver {
    pub fn new(client: PageClient) -> Self {
        Self { client }
    }
}

/// First usable `<video src>` / `<video><source src>` in document order,
/// made absolute against `page_url` when relative.
pub fn find_video_src(html: &str, page_url: &str) -> ResolutionOutcome {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    document
        .select(&VIDEO_SELECTOR)
        .filter_map(|element| element.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .find_map(|src| absolutize(src, base.as_ref()))
        .map(ResolutionOutcome::VideoUrl)
        .unwrap_or(ResolutionOutcome::NotFound)
}

fn absolutize(src: &str, base: Option<&Url>) -> Option<String> {
    let resolved = match base {
        Some(base) => base.join(src).ok()?,
        None => Url::parse(src).ok()?,
    };

    // blob: and data: sources only exist inside a live browser
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

#[async_trait]
impl VideoResolver for VideoElementResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::VideoElement
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Result<ResolutionOutcome> {
        let html = self.client.fetch_page(ctx.source_url).await?;
        debug!(url = ctx.source_url, bytes = html.len(), "page fetched for video element scan");
        Ok(find_video_src(&html, ctx.source_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Destination, PipelineError};
    use std::path::PathBuf;

    #[test]
    fn test_reads_video_src() {
        let html = r#"<html><body><video src="https://cdn.example.com/a.mp4"></video></body></html>"#;
        assert_eq!(
            find_video_src(html, "https://shop.example.com/item/1"),
            ResolutionOutcome::VideoUrl("https://cdn.example.com/a.mp4".to_string())
        );
    }

    #[test]
    fn test_reads_nested_source_element() {
        let html = r#"<video controls><source src="https://cdn.example.com/b.mp4" type="video/mp4"></video>"#;
        assert_eq!(
            find_video_src(html, "https://shop.example.com/item/1"),
            ResolutionOutcome::VideoUrl("https://cdn.example.com/b.mp4".to_string())
        );
    }

    #[test]
    fn test_resolves_relative_src() {
        let html = r#"<video src="/media/clip.mp4"></video>"#;
        assert_eq!(
            find_video_src(html, "https://shop.example.com/item/1"),
            ResolutionOutcome::VideoUrl("https://shop.example.com/media/clip.mp4".to_string())
        );
    }

    #[test]
    fn test_skips_blob_sources() {
        let html = r#"<video src="blob:https://shop.example.com/1234"></video>
                      <video src="https://cdn.example.com/c.mp4"></video>"#;
        assert_eq!(
            find_video_src(html, "https://shop.example.com/item/1"),
            ResolutionOutcome::VideoUrl("https://cdn.example.com/c.mp4".to_string())
        );
    }

    #[test]
    fn test_not_found_without_video() {
        let html = r#"<html><body><img src="a.jpg"><source src="x.mp4"></body></html>"#;
        assert_eq!(
            find_video_src(html, "https://shop.example.com/item/1"),
            ResolutionOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_fetches_page_independently() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/item")
            .with_status(200)
            .with_body(r#"<video src="/v/clip.mp4"></video>"#)
            .create_async()
            .await;

        let page_url = format!("{}/item", server.url());
        let destination = Destination {
            folder: PathBuf::from("out"),
            stem: "out".to_string(),
        };
        let ctx = ResolveContext {
            source_url: &page_url,
            page_html: None,
            destination: &destination,
        };

        let outcome = VideoElementResolver::default().try_resolve(&ctx).await.unwrap();

        assert_eq!(
            outcome,
            ResolutionOutcome::VideoUrl(format!("{}/v/clip.mp4", server.url()))
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_error_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/gone")
            .with_status(500)
            .create_async()
            .await;

        let page_url = format!("{}/gone", server.url());
        let destination = Destination {
            folder: PathBuf::from("out"),
            stem: "out".to_string(),
        };
        let ctx = ResolveContext {
            source_url: &page_url,
            page_html: None,
            destination: &destination,
        };

        let err = VideoElementResolver::default()
            .try_resolve(&ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Network(_)));
    }
}
