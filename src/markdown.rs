//! Rewrites `[label](file.ext#fragment "title")` links to the closest matching file.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{MarkdownLink, RewriteContext, encode_path};

/// File types a link may point at: documents, images, audio, video, PDF.
pub const LINKABLE_EXTENSIONS: [&str; 19] = [
    "md", //
    "png", "jpg", "jpeg", "gif", "bmp", "svg", //
    "mp3", "webm", "wav", "m4a", "ogg", "3gp", "flac", //
    "mp4", "ogv", "mov", "mkv", //
    "pdf",
];

/// Bracket part (`[label]` or an empty image `![]`), then a parenthesized
/// file path with a linkable extension, optional fragments and an optional title.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        concat!(
            r"(?:!\[\]|\[(?P<label>[^\]]+)\])",
            r"\(",
            r"(?P<filepath>[^)]+\.(?:{exts}))",
            r"(?P<fragment>(?:#[^)]*?)*)",
            r#"(?P<title>(?:\s+".*")*)"#,
            r"\)",
        ),
        exts = LINKABLE_EXTENSIONS.join("|"),
    );
    return Regex::new(&pattern).expect("valid regex");
});

/// Rewrite every markdown link in `text` whose file can be found in the
/// corpus, relative to the document at `page`.
///
/// Links that cannot be resolved keep their text; the annotation suffix is
/// appended to them when enabled. Absolute paths are left alone.
pub fn rewrite_markdown_links(text: &str, page: &Path, ctx: &RewriteContext<'_>) -> String {
    return MARKDOWN_LINK
        .replace_all(text, |caps: &Captures<'_>| return replace_markdown_link(caps, page, ctx))
        .into_owned();
}

/// Replacement text for one markdown link match.
fn replace_markdown_link(caps: &Captures<'_>, page: &Path, ctx: &RewriteContext<'_>) -> String {
    let whole = caps.get(0).map_or("", |m| return m.as_str());
    let link = MarkdownLink::from_captures(caps);

    if link.filepath.starts_with('/') {
        return whole.to_string();
    }

    let Some(path) = ctx.resolve_or_report(Path::new(link.filepath.trim()), page) else {
        return ctx.annotation.apply(whole.to_string(), true);
    };

    let destination = format!(
        "{}{}{}",
        encode_path(&path),
        ctx.slugs.slugify(Some(link.fragment)),
        link.title
    );
    let rewritten = match link.label {
        Some(label) => format!("[{label}]({destination})"),
        None => format!("![]({destination})"),
    };

    ctx.reporter.rewritten(whole, &rewritten);
    return rewritten;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::error::ResolveError;
    use crate::index::FileIndex;
    use crate::report::testing::CapturingReporter;
    use crate::resolver::PathResolver;
    use crate::slug::SlugNormalizer;

    /// Index shaped like a small notes vault.
    fn vault() -> FileIndex {
        return FileIndex::build([
            "/docs/foo/bar/One.md",
            "/docs/foo/buzz/One.md",
            "/docs/foo/buzz/Another Page.md",
            "/docs/assets/Swearing at work.jpg",
            "/docs/Links.md",
        ]);
    }

    fn rewrite(text: &str, annotation: &Annotation) -> (String, CapturingReporter) {
        let index = vault();
        let slugs = SlugNormalizer::default();
        let reporter = CapturingReporter::default();
        let ctx = RewriteContext {
            annotation,
            reporter: &reporter,
            resolver: PathResolver::new(&index),
            slugs: &slugs,
        };
        let out = rewrite_markdown_links(text, Path::new("/docs/pages/Links.md"), &ctx);
        return (out, reporter);
    }

    fn active_annotation() -> Annotation {
        let reporter = CapturingReporter::default();
        return Annotation::from_settings(&[".invalid".to_string()], &["attr_list".to_string()], &reporter);
    }

    #[test]
    fn rewrites_bare_filename_with_encoding() {
        let (out, _) = rewrite("See [the page](Another Page.md).", &Annotation::disabled());
        assert_eq!(out, "See [the page](../foo/buzz/Another%20Page.md).");
    }

    #[test]
    fn normalizes_fragment_and_keeps_title() {
        let (out, _) = rewrite(r#"[x](Another Page.md#First Header "Tip")"#, &Annotation::disabled());
        assert_eq!(out, r#"[x](../foo/buzz/Another%20Page.md#first-header "Tip")"#);
    }

    #[test]
    fn corrects_wrong_relative_directory() {
        let (out, _) = rewrite("[one](../../elsewhere/One.md)", &Annotation::disabled());
        assert_eq!(out, "[one](../foo/bar/One.md)");
    }

    #[test]
    fn images_keep_their_marker() {
        let (out, _) = rewrite("![alt](Swearing at work.jpg) ![](Swearing at work.jpg)", &Annotation::disabled());
        assert_eq!(
            out,
            "![alt](../assets/Swearing%20at%20work.jpg) ![](../assets/Swearing%20at%20work.jpg)"
        );
    }

    #[test]
    fn unresolved_link_is_untouched_without_annotation() {
        let (out, reporter) = rewrite("[bad](Invalid Page.md)", &Annotation::disabled());
        assert_eq!(out, "[bad](Invalid Page.md)");
        assert_eq!(
            reporter.unresolved_errors(),
            vec![ResolveError::UnresolvableTarget {
                filename: "Invalid Page.md".to_string(),
                page_dir: "/docs/pages".into(),
            }]
        );
    }

    #[test]
    fn unresolved_link_gets_annotation_suffix() {
        let (out, _) = rewrite("[bad](Invalid Page.md) and [ok](One.md)", &active_annotation());
        assert_eq!(out, "[bad](Invalid Page.md){: .invalid} and [ok](../foo/bar/One.md)");
    }

    #[test]
    fn leaves_absolute_paths_and_unknown_extensions() {
        let text = "[abs](/docs/One.md) [web](https://example.com/page) [zip](archive.zip)";
        let (out, reporter) = rewrite(text, &active_annotation());
        assert_eq!(out, text);
        assert!(reporter.events().is_empty());
    }
}
