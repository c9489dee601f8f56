use async_trait::async_trait;

use crate::domain::{Destination, ResolutionOutcome, Result, StrategyKind};

/// Everything a strategy may look at while resolving one request.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub source_url: &'a str,
    /// Body of the metadata fetch, `None` when that fetch failed
    pub page_html: Option<&'a str>,
    pub destination: &'a Destination,
}

/// One method of locating (or saving) the video behind a product page.
#[async_trait]
pub trait VideoResolver: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Result<ResolutionOutcome>;
}
