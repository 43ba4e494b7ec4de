//! Rewrite wiki links (`[[Note#Heading|label]]`) and bare-filename markdown
//! links into relative links that resolve from the linking document.
//!
//! Build one [`bridge::Bridge`] per run from the full list of document and
//! asset locations, then call [`bridge::Bridge::rewrite_document`] for each
//! document. Problems with individual links never fail a rewrite; they are
//! delivered to a [`report::Reporter`].

pub mod annotation;
pub mod bridge;
pub mod config;
pub mod error;
pub mod index;
pub mod markdown;
pub mod regions;
pub mod report;
pub mod resolver;
pub mod slug;
pub mod types;
pub mod wikilink;

pub use annotation::Annotation;
pub use bridge::Bridge;
pub use error::{Error, ResolveError};
pub use index::FileIndex;
pub use report::{CountingReporter, Reporter, TracingReporter};
pub use resolver::PathResolver;
pub use slug::{HeadingSlugger, SlugNormalizer, UnicodeSlugger};
