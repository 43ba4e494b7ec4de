//! CLI commands for wikibridge: build and check.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use serde::Serialize;
use walkdir::WalkDir;

use wikibridge::bridge::Bridge;
use wikibridge::config::Config;
use wikibridge::error::{Error, ResolveError};
use wikibridge::report::{CountingReporter, Reporter, TracingReporter};

/// Output format for `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per unresolved link, then a summary.
    Text,
    /// A single JSON document on stdout.
    Json,
}

/// Every file of the docs tree, as absolute locations in walk order.
struct Corpus {
    /// Absolute docs directory.
    docs_dir: PathBuf,
    /// Absolute locations of documents and assets, sorted by path.
    files: Vec<PathBuf>,
}

impl Corpus {
    /// Walk `docs_dir` and collect every regular file, skipping anything
    /// under `skip` (the output directory when it lives inside the docs).
    ///
    /// # Errors
    ///
    /// Returns `Error::DocsDirNotFound` if the directory is missing, or
    /// `Error::WalkDir` if the walk fails part way.
    fn collect(docs_dir: &Path, skip: Option<&Path>) -> Result<Self, Error> {
        if !docs_dir.is_dir() {
            return Err(Error::DocsDirNotFound {
                path: docs_dir.to_path_buf(),
            });
        }
        let docs_dir = std::path::absolute(docs_dir)?;

        let mut files = Vec::new();
        // Sorted so that same-named files are indexed, and tie-broken, identically on every run.
        for entry in WalkDir::new(&docs_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if skip.is_some_and(|s| return entry.path().starts_with(s)) {
                continue;
            }
            files.push(entry.into_path());
        }

        return Ok(Self { docs_dir, files });
    }

    /// Path of `file` inside the docs directory.
    fn relative<'a>(&self, file: &'a Path) -> &'a Path {
        return file.strip_prefix(&self.docs_dir).unwrap_or(file);
    }

    /// Documents to rewrite: markdown files not excluded by the config.
    fn documents<'a>(&'a self, config: &'a Config) -> impl Iterator<Item = &'a PathBuf> + 'a {
        return self.files.iter().filter(move |file| {
            return is_markdown(file) && config.should_rewrite(&self.relative(file).to_string_lossy());
        });
    }
}

/// Whether `path` is a markdown document.
fn is_markdown(path: &Path) -> bool {
    return path.extension().is_some_and(|ext| return ext == "md");
}

/// Build a bridge over the whole corpus with the configured options.
fn bridge_for<R: Reporter>(config: &Config, corpus: &Corpus, reporter: R) -> Bridge<R> {
    let annotation = config.annotation(&reporter);
    tracing::debug!(annotate_unresolved = annotation.is_active(), "annotation settings loaded");

    let bridge = Bridge::from_locations(corpus.files.iter().cloned(), config.slugs(), annotation, reporter);
    if bridge.index().is_empty() {
        tracing::warn!(docs_dir = %corpus.docs_dir.display(), "no files to index; every link will be unresolved");
    }
    return bridge;
}

/// Rewrite every document of the docs tree into `out`, copying assets and
/// excluded documents unchanged.
///
/// # Errors
///
/// Returns errors from config loading, walking the docs tree, or file I/O.
pub fn build(root: &Path, out: &Path) -> Result<(), Error> {
    let config = Config::load(root)?;
    let out = std::path::absolute(out)?;
    let corpus = Corpus::collect(&root.join(&config.docs_dir), Some(out.as_path()))?;
    let bridge = bridge_for(&config, &corpus, CountingReporter::new(TracingReporter));

    let mut rewritten = 0_usize;
    for file in &corpus.files {
        let dest = out.join(corpus.relative(file));
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let rewrite = is_markdown(file) && config.should_rewrite(&corpus.relative(file).to_string_lossy());
        if rewrite {
            let text = std::fs::read_to_string(file)?;
            std::fs::write(&dest, bridge.rewrite_document(&text, file))?;
            rewritten = rewritten.saturating_add(1);
        } else {
            std::fs::copy(file, &dest)?;
        }
    }

    let copied = corpus.files.len().saturating_sub(rewritten);
    let unresolved = bridge.reporter().unresolved_count();
    eprintln!(
        "Rewrote {rewritten} documents, copied {copied} files to {} ({} distinct filenames indexed, {unresolved} unresolved links)",
        out.display(),
        bridge.index().len()
    );
    return Ok(());
}

/// Unresolved links seen since the last drain, forwarded to tracing too.
#[derive(Default)]
struct UnresolvedLog {
    /// Errors for the document currently being rewritten.
    pending: Mutex<Vec<ResolveError>>,
}

impl UnresolvedLog {
    /// Take everything recorded so far.
    fn drain(&self) -> Vec<ResolveError> {
        let mut pending = self.pending.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        return std::mem::take(&mut *pending);
    }
}

impl Reporter for UnresolvedLog {
    fn configuration_mismatch(&self) {
        TracingReporter.configuration_mismatch();
    }

    fn unresolved(&self, error: &ResolveError) {
        TracingReporter.unresolved(error);
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(error.clone());
    }

    fn rewritten(&self, original: &str, replacement: &str) {
        TracingReporter.rewritten(original, replacement);
    }
}

/// JSON shape of a `check` run.
#[derive(Serialize)]
struct CheckJson {
    /// Number of documents scanned.
    documents: usize,
    /// Every link that could not be resolved.
    unresolved: Vec<UnresolvedJson>,
}

/// One unresolved link in JSON output.
#[derive(Serialize)]
struct UnresolvedJson {
    /// Document holding the link, relative to the docs directory.
    document: String,
    /// Bare filename that was looked up.
    filename: String,
    /// Human-readable reason.
    reason: String,
}

/// Rewrite every document in memory and report links that could not be resolved.
/// Exits 0 when every link resolves, 1 otherwise.
///
/// # Errors
///
/// Returns errors from config loading, walking the docs tree, or reading documents.
pub fn check(root: &Path, format: OutputFormat) -> Result<ExitCode, Error> {
    let config = Config::load(root)?;
    let corpus = Corpus::collect(&root.join(&config.docs_dir), None)?;
    let bridge = bridge_for(&config, &corpus, UnresolvedLog::default());

    let mut documents = 0_usize;
    let mut unresolved: Vec<UnresolvedJson> = Vec::new();
    for file in corpus.documents(&config) {
        let text = std::fs::read_to_string(file)?;
        bridge.rewrite_document(&text, file);
        documents = documents.saturating_add(1);

        let document = corpus.relative(file).display().to_string();
        for error in bridge.reporter().drain() {
            unresolved.push(UnresolvedJson {
                document: document.clone(),
                filename: unresolved_filename(&error).to_string(),
                reason: error.to_string(),
            });
        }
    }

    match format {
        OutputFormat::Json => {
            let report = CheckJson { documents, unresolved };
            // The report holds only strings and counts, which always serialize.
            let json = serde_json::to_string_pretty(&report).unwrap_or_default();
            println!("{json}");
            return Ok(exit_code_for(report.unresolved.len()));
        },
        OutputFormat::Text => {
            for entry in &unresolved {
                println!("UNRESOLVED  {}  {}", entry.document, entry.filename);
            }
            if unresolved.is_empty() {
                println!("All links in {documents} documents resolve");
            } else {
                println!();
                println!("{} unresolved links in {documents} documents", unresolved.len());
            }
            return Ok(exit_code_for(unresolved.len()));
        },
    }
}

/// The filename a resolution error is about.
fn unresolved_filename(error: &ResolveError) -> &str {
    return match error {
        ResolveError::NoCandidates { filename } | ResolveError::UnresolvableTarget { filename, .. } => filename,
    };
}

/// 0 when nothing is unresolved, 1 otherwise.
fn exit_code_for(unresolved: usize) -> ExitCode {
    if unresolved == 0 {
        return ExitCode::SUCCESS;
    }
    return ExitCode::from(1);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    fn write(path: &Path, text: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn build_rewrites_documents_and_copies_assets() {
        let root = tempfile::tempdir().unwrap();
        let docs = root.path().join("docs");
        write(&docs.join("pages/Links.md"), "[[Target]] ![[pic.png]] [[Missing]]\n");
        write(&docs.join("deep/er/Target.md"), "# Target\n");
        write(&docs.join("img/pic.png"), "not really a png");

        let out = root.path().join("out");
        build(root.path(), &out).unwrap();

        let links = std::fs::read_to_string(out.join("pages/Links.md")).unwrap();
        assert_eq!(
            links,
            "[Target](../deep/er/Target.md) ![pic.png](../img/pic.png) [Missing](Missing)\n"
        );
        assert_eq!(std::fs::read_to_string(out.join("img/pic.png")).unwrap(), "not really a png");
    }

    #[test]
    fn build_skips_output_inside_docs_and_excluded_documents() {
        let root = tempfile::tempdir().unwrap();
        let docs = root.path().join("docs");
        write(&root.path().join(".wikibridge.toml"), "exclude = [\"drafts/\"]\n");
        write(&docs.join("Index.md"), "[[Index]]\n");
        write(&docs.join("drafts/Wip.md"), "[[Index]]\n");

        let out = docs.join("site");
        build(root.path(), &out).unwrap();
        build(root.path(), &out).unwrap();

        assert_eq!(std::fs::read_to_string(out.join("Index.md")).unwrap(), "[Index](Index.md)\n");
        assert_eq!(std::fs::read_to_string(out.join("drafts/Wip.md")).unwrap(), "[[Index]]\n");
        assert!(!out.join("site").exists());
    }

    #[test]
    fn bridge_indexes_every_file_of_the_corpus() {
        let root = tempfile::tempdir().unwrap();
        let docs = root.path().join("docs");
        write(&docs.join("a/index.md"), "");
        write(&docs.join("b/index.md"), "");
        write(&docs.join("img/pic.png"), "");

        let corpus = Corpus::collect(&docs, None).unwrap();
        let bridge = bridge_for(&Config::default(), &corpus, TracingReporter);
        assert_eq!(bridge.index().len(), 2);
        assert_eq!(bridge.index().entries_for("index.md").len(), 2);
    }

    #[test]
    fn empty_docs_dir_builds_an_empty_index() {
        let root = tempfile::tempdir().unwrap();
        let docs = root.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();

        let corpus = Corpus::collect(&docs, None).unwrap();
        assert!(bridge_for(&Config::default(), &corpus, TracingReporter).index().is_empty());
        build(root.path(), &root.path().join("out")).unwrap();
    }

    #[test]
    fn missing_docs_dir_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let result = check(root.path(), OutputFormat::Text);
        assert!(matches!(result, Err(Error::DocsDirNotFound { .. })));
    }

    #[test]
    fn unresolved_log_drains_per_document() {
        let log = UnresolvedLog::default();
        log.unresolved(&ResolveError::NoCandidates {
            filename: "x.md".to_string(),
        });
        assert_eq!(log.drain().len(), 1);
        assert!(log.drain().is_empty());
    }
}
