//! Document-level pipeline composing both rewriters over one frozen index.

use std::path::{Path, PathBuf};

use crate::annotation::Annotation;
use crate::index::FileIndex;
use crate::markdown::rewrite_markdown_links;
use crate::report::Reporter;
use crate::resolver::PathResolver;
use crate::slug::SlugNormalizer;
use crate::types::RewriteContext;
use crate::wikilink::{rewrite_wikilinks, strip_comments, transform_callouts};

/// Rewrites links in any document of one corpus.
///
/// Holds only read-only state, so a shared reference can be handed to one
/// worker per document.
#[derive(Debug)]
pub struct Bridge<R> {
    /// Suffix for unresolved links.
    annotation: Annotation,
    /// Corpus-wide filename lookup, built before any rewrite.
    index: FileIndex,
    /// Sink for degrade-and-continue events.
    reporter: R,
    /// Fragment normalization.
    slugs: SlugNormalizer,
}

impl<R: Reporter> Bridge<R> {
    /// Bridge over an already built index.
    pub const fn new(index: FileIndex, slugs: SlugNormalizer, annotation: Annotation, reporter: R) -> Self {
        return Self {
            annotation,
            index,
            reporter,
            slugs,
        };
    }

    /// Index every location, then build the bridge.
    pub fn from_locations<I>(locations: I, slugs: SlugNormalizer, annotation: Annotation, reporter: R) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        return Self::new(FileIndex::build(locations), slugs, annotation, reporter);
    }

    /// The index this bridge resolves against.
    pub const fn index(&self) -> &FileIndex {
        return &self.index;
    }

    /// The reporter receiving this bridge's events.
    pub const fn reporter(&self) -> &R {
        return &self.reporter;
    }

    /// Rewrite every link in `text`, the content of the document at `page`.
    ///
    /// Markdown links are handled first, then wiki links. Text outside links
    /// is returned byte for byte.
    pub fn rewrite_document(&self, text: &str, page: &Path) -> String {
        let ctx = RewriteContext {
            annotation: &self.annotation,
            reporter: &self.reporter,
            resolver: PathResolver::new(&self.index),
            slugs: &self.slugs,
        };

        let text = transform_callouts(text.to_string());
        let text = rewrite_markdown_links(&text, page, &ctx);
        let text = rewrite_wikilinks(&text, page, &ctx);
        return strip_comments(text);
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::report::testing::CapturingReporter;

    fn bridge(annotation: Annotation) -> Bridge<CapturingReporter> {
        let locations = ["/A/One.md", "/B/One.md", "/C/Page.md", "/B/Guide.md"].map(PathBuf::from);
        return Bridge::from_locations(locations, SlugNormalizer::default(), annotation, CapturingReporter::default());
    }

    #[test]
    fn both_syntaxes_in_one_document() {
        let bridge = bridge(Annotation::disabled());
        let text = "# Page\n\n[one](One.md#Intro Part) and [[Guide#Setup]].\n\n`[[Guide]]` stays.\n";
        let out = bridge.rewrite_document(text, Path::new("/C/Page.md"));

        assert_eq!(
            out,
            "# Page\n\n[one](../A/One.md#intro-part) and [Guide#setup](../B/Guide.md#setup).\n\n`[[Guide]]` stays.\n"
        );
    }

    #[test]
    fn tie_break_follows_insertion_order() {
        let bridge = bridge(Annotation::disabled());
        let out = bridge.rewrite_document("[[One.md]]", Path::new("/C/Page.md"));
        assert_eq!(out, "[One.md](../A/One.md)");
    }

    #[test]
    fn rewriting_twice_is_stable_for_resolved_links() {
        let bridge = bridge(Annotation::disabled());
        let once = bridge.rewrite_document("[x](One.md)", Path::new("/C/Page.md"));
        let twice = bridge.rewrite_document(&once, Path::new("/C/Page.md"));
        assert_eq!(once, twice);
    }

    #[test]
    fn unresolved_markdown_link_round_trips_with_annotation() {
        let mismatch = CapturingReporter::default();
        let annotation = Annotation::from_settings(&[".invalid".to_string()], &["attr_list".to_string()], &mismatch);
        let bridge = bridge(annotation);

        let out = bridge.rewrite_document("[x](Invalid Page.md)", Path::new("/C/Page.md"));
        assert_eq!(out, "[x](Invalid Page.md){: .invalid}");
        assert_eq!(bridge.reporter().unresolved_errors().len(), 1);
    }

    #[test]
    fn bridge_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Bridge<CapturingReporter>>();
    }
}
