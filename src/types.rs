/// Shared rewriting context and the per-match link descriptors.
use std::path::Path;

use regex::Captures;

use crate::annotation::Annotation;
use crate::report::Reporter;
use crate::resolver::PathResolver;
use crate::slug::SlugNormalizer;

/// Everything a rewriter needs besides the text itself. Read-only, so one
/// context can serve any number of documents.
#[derive(Clone, Copy)]
pub struct RewriteContext<'a> {
    /// Suffix for links that could not be resolved.
    pub annotation: &'a Annotation,
    /// Sink for degrade-and-continue events.
    pub reporter: &'a dyn Reporter,
    /// Filename lookup against the corpus.
    pub resolver: PathResolver<'a>,
    /// Fragment normalization shared by both link syntaxes.
    pub slugs: &'a SlugNormalizer,
}

impl RewriteContext<'_> {
    /// Resolve `target` from `page`, reporting any failure.
    pub fn resolve_or_report(&self, target: &Path, page: &Path) -> Option<String> {
        return match self.resolver.resolve(target, page) {
            Ok(path) => Some(path),
            Err(e) => {
                self.reporter.unresolved(&e);
                None
            },
        };
    }
}

/// Percent-encode a `/`-separated relative path one segment at a time, so
/// the separators survive.
pub fn encode_path(path: &str) -> String {
    return path
        .split('/')
        .map(|segment| return urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
}

/// A `[label](filepath#fragment "title")` link, or the `![](...)` image form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink<'t> {
    /// Relative file path as written, untrimmed.
    pub filepath: &'t str,
    /// Zero or more `#...` suffixes, possibly empty.
    pub fragment: &'t str,
    /// Bracketed label; `None` for the `![]` image form.
    pub label: Option<&'t str>,
    /// Quoted title including its leading whitespace, possibly empty.
    pub title: &'t str,
}

impl<'t> MarkdownLink<'t> {
    /// Build from a match of the markdown link pattern.
    pub fn from_captures(caps: &Captures<'t>) -> Self {
        let text = |name: &str| return caps.name(name).map_or("", |m| return m.as_str());
        return Self {
            filepath: text("filepath"),
            fragment: text("fragment"),
            label: caps.name("label").map(|m| return m.as_str()),
            title: text("title"),
        };
    }
}

/// A `[[filepath#fragment|label]]` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink<'t> {
    /// Target as written, untrimmed; empty for in-page anchors.
    pub filepath: &'t str,
    /// `#heading` including the marker, if present.
    pub fragment: Option<&'t str>,
    /// Heading text without the marker, if present.
    pub fragment_text: Option<&'t str>,
    /// Alias after `|`, if present (may be empty).
    pub label: Option<&'t str>,
}

impl<'t> WikiLink<'t> {
    /// Build from a match of the wiki-link pattern.
    pub fn from_captures(caps: &Captures<'t>) -> Self {
        let text = |name: &str| return caps.name(name).map(|m| return m.as_str());
        return Self {
            filepath: text("filepath").unwrap_or(""),
            fragment: text("fragment"),
            fragment_text: text("fragment_text"),
            label: text("label"),
        };
    }

    /// The alias when one was given and is not empty.
    pub fn alias(&self) -> Option<&'t str> {
        return self.label.filter(|l| return !l.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::encode_path;

    #[test]
    fn encodes_segments_but_keeps_separators() {
        assert_eq!(encode_path("../foo/buzz/Another Page.md"), "../foo/buzz/Another%20Page.md");
        assert_eq!(encode_path("a/b_c-d.e~f.md"), "a/b_c-d.e~f.md");
        assert_eq!(encode_path("Ünï cödé.md"), "%C3%9Cn%C3%AF%20c%C3%B6d%C3%A9.md");
    }
}
