pub mod media_extractor;
pub mod script_scan;
pub mod traits;
pub mod video_element;

pub use media_extractor::{ExtractorConfig, MediaExtractorResolver};
pub use script_scan::ScriptScanResolver;
pub use traits::{ResolveContext, VideoResolver};
pub use video_element::VideoElementResolver;
