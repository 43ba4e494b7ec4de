//! Heading text to URL fragment normalization.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Separator used when the configuration does not name one.
pub const DEFAULT_SEPARATOR: &str = "-";

/// Characters that never survive slugification.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Turns heading text into an anchor slug, given a word separator.
///
/// The rendered heading IDs are produced by the same function, which is why
/// it is pluggable rather than fixed.
pub trait HeadingSlugger: Send + Sync {
    /// Slugify `text`, joining words with `separator`. No leading `#`.
    fn slug(&self, text: &str, separator: &str) -> String;
}

impl<F> HeadingSlugger for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn slug(&self, text: &str, separator: &str) -> String {
        return self(text, separator);
    }
}

/// Unicode-preserving slugifier, matching the behaviour of Python-Markdown's
/// `slugify_unicode`: strip punctuation, trim, lowercase, then collapse
/// whitespace and separator runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSlugger;

impl HeadingSlugger for UnicodeSlugger {
    fn slug(&self, text: &str, separator: &str) -> String {
        let stripped = NON_SLUG_CHARS.replace_all(text, "");
        let lowered = stripped.trim().to_lowercase();
        return collapse_separator_runs(&lowered, separator);
    }
}

/// Replace every run of whitespace or separator characters with a single separator.
fn collapse_separator_runs(text: &str, separator: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c.is_whitespace() || separator.contains(c) {
            if !in_run {
                result.push_str(separator);
                in_run = true;
            }
            continue;
        }
        result.push(c);
        in_run = false;
    }
    return result;
}

/// Wraps a heading slugger with the configured separator and produces
/// `#fragment` strings for both link syntaxes.
pub struct SlugNormalizer {
    /// Word separator handed to the slugger.
    separator: String,
    /// The pluggable heading slug function.
    slugger: Box<dyn HeadingSlugger>,
}

impl SlugNormalizer {
    /// Normalizer over a custom slug function.
    pub fn new(slugger: impl HeadingSlugger + 'static, separator: impl Into<String>) -> Self {
        return Self {
            separator: separator.into(),
            slugger: Box::new(slugger),
        };
    }

    /// The built-in slugifier with the given separator.
    pub fn with_separator(separator: impl Into<String>) -> Self {
        return Self::new(UnicodeSlugger, separator);
    }

    /// Fragment for `text`: `""` when there is nothing to anchor to,
    /// otherwise `#` followed by the slug.
    pub fn slugify(&self, text: Option<&str>) -> String {
        return match text {
            None | Some("") => String::new(),
            Some(text) => format!("#{}", self.slugger.slug(text, &self.separator)),
        };
    }
}

impl Default for SlugNormalizer {
    fn default() -> Self {
        return Self::with_separator(DEFAULT_SEPARATOR);
    }
}

impl fmt::Debug for SlugNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("SlugNormalizer")
            .field("separator", &self.separator)
            .finish_non_exhaustive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_give_no_fragment() {
        let slugs = SlugNormalizer::default();
        assert_eq!(slugs.slugify(None), "");
        assert_eq!(slugs.slugify(Some("")), "");
    }

    #[test]
    fn simple_heading() {
        let slugs = SlugNormalizer::default();
        assert_eq!(slugs.slugify(Some("My Header")), "#my-header");
    }

    #[test]
    fn raw_fragment_marker_is_dropped() {
        let slugs = SlugNormalizer::default();
        assert_eq!(slugs.slugify(Some("#first-header")), "#first-header");
        assert_eq!(slugs.slugify(Some("#Some Header")), "#some-header");
    }

    #[test]
    fn punctuation_and_whitespace_runs() {
        let slugs = SlugNormalizer::default();
        assert_eq!(slugs.slugify(Some("  What's  New?  ")), "#whats-new");
        assert_eq!(slugs.slugify(Some("a - b")), "#a-b");
    }

    #[test]
    fn unicode_letters_survive() {
        let slugs = SlugNormalizer::default();
        assert_eq!(slugs.slugify(Some("Über Straße")), "#über-straße");
    }

    #[test]
    fn custom_separator() {
        let slugs = SlugNormalizer::with_separator("_");
        assert_eq!(slugs.slugify(Some("My Header")), "#my_header");
    }

    #[test]
    fn closure_slugger_receives_separator() {
        let slugs = SlugNormalizer::new(
            |text: &str, sep: &str| return format!("{}{sep}x", text.len()),
            "+",
        );
        assert_eq!(slugs.slugify(Some("abc")), "#3+x");
    }
}
