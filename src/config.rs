use std::path::{Path, PathBuf};

use crate::annotation::Annotation;
use crate::error::Error;
use crate::report::Reporter;
use crate::slug::{DEFAULT_SEPARATOR, SlugNormalizer};

/// Name of the project config file, looked up in the project root.
pub const CONFIG_FILE: &str = ".wikibridge.toml";

/// Project configuration loaded from `.wikibridge.toml`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the document tree, relative to the project root.
    pub docs_dir: PathBuf,
    /// Path prefixes (relative to `docs_dir`) of documents left unrewritten.
    pub exclude: Vec<String>,
    /// Attribute names appended as `{: ...}` to unresolved links.
    pub invalid_link_attributes: Vec<String>,
    /// Markdown extensions the renderer has enabled.
    pub markdown_extensions: Vec<String>,
    /// Heading anchor settings.
    pub toc: TocConfig,
}

/// `[toc]` table: how headings become anchors in the rendered output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    /// Word separator inside slugs.
    pub separator: String,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            docs_dir: PathBuf::from("docs"),
            exclude: Vec::new(),
            invalid_link_attributes: Vec::new(),
            markdown_extensions: Vec::new(),
            toc: TocConfig::default(),
        };
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        return Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        };
    }
}

impl Config {
    /// Load config from `.wikibridge.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist, and an error if it exists
    /// but is malformed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        return Ok(toml::from_str(&content)?);
    }

    /// Slug normalizer using the built-in slugifier and the configured separator.
    pub fn slugs(&self) -> SlugNormalizer {
        return SlugNormalizer::with_separator(self.toc.separator.clone());
    }

    /// Annotation for unresolved links; reports a mismatch once if the
    /// attributes cannot be rendered.
    pub fn annotation(&self, reporter: &dyn Reporter) -> Annotation {
        return Annotation::from_settings(&self.invalid_link_attributes, &self.markdown_extensions, reporter);
    }

    /// Whether the document at `relative_path` (inside `docs_dir`) gets rewritten.
    pub fn should_rewrite(&self, relative_path: &str) -> bool {
        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}
