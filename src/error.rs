/// Crate-level error types for wikibridge.
use std::path::PathBuf;

/// Host-level failures. Each variant names the file or directory involved so
/// the rendered diagnostic is actionable on its own.
#[allow(clippy::error_impl_error, reason = "crate-level error type shared by lib and binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured docs directory does not exist.
    #[error("docs directory not found: {}", path.display())]
    DocsDirNotFound {
        /// Path that was expected to hold the documents.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// TOML deserialization of `.wikibridge.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// Walking the docs tree failed part way.
    #[error("walk: {0}")]
    WalkDir(
        /// The wrapped directory walk error.
        #[from]
        walkdir::Error,
    ),

    /// The filesystem watcher could not be created or attached.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}

/// Why a single link could not be resolved. Never fatal: the rewriters
/// report it and fall back to the original or best-effort link text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The index returned a key with an empty candidate list.
    #[error("no candidates for filepath `{filename}` were given")]
    NoCandidates {
        /// Bare filename that was looked up.
        filename: String,
    },

    /// No indexed location carries this filename, or none of the candidates
    /// is reachable through a relative path.
    #[error("unable to find `{filename}` from directory {}", page_dir.display())]
    UnresolvableTarget {
        /// Bare filename that was looked up.
        filename: String,
        /// Directory of the document holding the link.
        page_dir: PathBuf,
    },
}
