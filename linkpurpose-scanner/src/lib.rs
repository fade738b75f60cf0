pub mod error;
pub mod extractor;
pub mod heading;
pub mod record;
pub mod renderer;
pub mod text;
pub mod xpath;

pub use error::ScanError;
pub use extractor::extract;
pub use heading::HeadingIndex;
pub use record::{Analysis, Judgment, LinkContext, LinkRecord};
pub use renderer::{PageRenderer, RendererConfig, WebDriverRenderer};
pub use xpath::xpath_of;
