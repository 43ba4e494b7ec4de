//! Converts `[[filepath#fragment|label]]` wiki links into markdown links.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::regions::{Region, split_regions};
use crate::types::{RewriteContext, WikiLink, encode_path};

/// Extension of the default document format, tried when a target has none.
const DEFAULT_DOCUMENT_SUFFIX: &str = ".md";

/// `[[filepath]]`, `[[filepath#fragment]]`, `[[filepath|label]]`,
/// `[[#fragment]]` and combinations.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static WIKI_LINK: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(concat!(
        r"\[\[",
        r"(?P<filepath>[^\]#|]*)",
        r"(?P<fragment>#(?P<fragment_text>[^|\]]+))*",
        r"(?:\|(?P<label>[^\]]*))*",
        r"\]\]",
    ))
    .expect("valid regex");
});

/// Rewrite every wiki link outside code regions of `text`, relative to the
/// document at `page`. Code regions are copied verbatim.
pub fn rewrite_wikilinks(text: &str, page: &Path, ctx: &RewriteContext<'_>) -> String {
    let mut output = String::with_capacity(text.len());

    for region in split_regions(text) {
        match region {
            Region::Code(code) => output.push_str(code),
            Region::Prose(prose) => {
                let rewritten = WIKI_LINK
                    .replace_all(prose, |caps: &Captures<'_>| return replace_wikilink(caps, page, ctx));
                output.push_str(&rewritten);
            },
        }
    }

    return output;
}

/// Replacement text for one wiki link match.
fn replace_wikilink(caps: &Captures<'_>, page: &Path, ctx: &RewriteContext<'_>) -> String {
    let whole = caps.get(0).map_or("", |m| return m.as_str());
    let link = WikiLink::from_captures(caps);
    let filepath = link.filepath.trim();
    let fragment = ctx.slugs.slugify(link.fragment);

    if filepath.is_empty() {
        let label = link.alias().or(link.fragment_text).unwrap_or("");
        let rewritten = format!("[{label}]({fragment})");
        ctx.reporter.rewritten(whole, &rewritten);
        return rewritten;
    }

    let resolved = resolve_with_default_suffix(filepath, page, ctx);
    let label = link
        .alias()
        .map_or_else(|| return format!("{filepath}{fragment}"), ToString::to_string);
    let unresolved = resolved.is_none();
    let destination = encode_path(&resolved.unwrap_or_else(|| return normalized_target(filepath)));

    let rewritten = format!("[{label}]({destination}{fragment})");
    ctx.reporter.rewritten(whole, &rewritten);
    return ctx.annotation.apply(rewritten, unresolved);
}

/// Resolve `filepath` as written, then with the default document suffix
/// appended to the whole name. Only a failure of both is reported, as the
/// error for the name the author wrote.
fn resolve_with_default_suffix(filepath: &str, page: &Path, ctx: &RewriteContext<'_>) -> Option<String> {
    let first = match ctx.resolver.resolve(Path::new(filepath), page) {
        Ok(path) => return Some(path),
        Err(e) => e,
    };

    let with_suffix = format!("{filepath}{DEFAULT_DOCUMENT_SUFFIX}");
    return match ctx.resolver.resolve(Path::new(&with_suffix), page) {
        Ok(path) => Some(path),
        Err(_) => {
            ctx.reporter.unresolved(&first);
            None
        },
    };
}

/// `filepath` as a path would print it: `.` segments and repeated or
/// trailing separators dropped, `..` kept.
fn normalized_target(filepath: &str) -> String {
    let parts: Vec<&str> = Path::new(filepath)
        .components()
        .filter_map(|component| {
            return match component {
                Component::Normal(part) => part.to_str(),
                Component::ParentDir => Some(".."),
                Component::Prefix(_) | Component::RootDir | Component::CurDir => None,
            };
        })
        .collect();

    let joined = parts.join("/");
    if filepath.starts_with('/') {
        return format!("/{joined}");
    }
    if joined.is_empty() {
        return ".".to_string();
    }
    return joined;
}

/// Extension point for callout blocks (`> [!note]`); returns the text unchanged.
pub fn transform_callouts(markdown: String) -> String {
    return markdown;
}

/// Extension point for inline `%% comments %%`; returns the text unchanged.
pub fn strip_comments(markdown: String) -> String {
    return markdown;
}
