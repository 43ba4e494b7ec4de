use std::path::{Component, Path, PathBuf};

use crate::error::ResolveError;
use crate::index::{FileIndex, bare_filename};

/// Picks the best indexed location for a link target and expresses it
/// relative to the linking document.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    /// Corpus-wide filename lookup.
    index: &'a FileIndex,
}

impl<'a> PathResolver<'a> {
    /// Resolver over a fully built index.
    pub const fn new(index: &'a FileIndex) -> Self {
        return Self { index };
    }

    /// Resolve `target` (only its final component is looked up) from the
    /// document at `page`. Returns a `/`-separated relative path.
    ///
    /// With several candidates the one with the fewest path segments wins;
    /// ties go to the candidate indexed first.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::UnresolvableTarget` when the filename is not
    /// indexed or no candidate yields a relative path, and
    /// `ResolveError::NoCandidates` when the index holds an empty entry.
    pub fn resolve(&self, target: &Path, page: &Path) -> Result<String, ResolveError> {
        let page_dir = page.parent().unwrap_or(Path::new(""));
        let filename = bare_filename(target).unwrap_or_default();

        if !self.index.contains(&filename) {
            return Err(ResolveError::UnresolvableTarget {
                filename,
                page_dir: page_dir.to_path_buf(),
            });
        }

        let candidates = self.index.entries_for(&filename);
        if candidates.is_empty() {
            return Err(ResolveError::NoCandidates { filename });
        }

        return best_relative_path(page_dir, candidates).ok_or_else(|| {
            return ResolveError::UnresolvableTarget {
                filename,
                page_dir: page_dir.to_path_buf(),
            };
        });
    }
}

/// The shortest relative path from `page_dir` to any candidate, first wins on ties.
fn best_relative_path(page_dir: &Path, candidates: &[PathBuf]) -> Option<String> {
    let mut best: Option<Vec<String>> = None;

    for candidate in candidates {
        let Some(segments) = relative_segments(page_dir, candidate) else {
            continue;
        };
        let shorter = best.as_ref().is_none_or(|b| return segments.len() < b.len());
        if shorter {
            best = Some(segments);
        }
    }

    return best.map(|segments| return segments.join("/"));
}

/// Lexical relative path from directory `from` to `to`, as path segments.
///
/// Both paths must be absolute and share the same prefix (drive on Windows);
/// otherwise there is no relative path and `None` is returned. A path to
/// the directory itself is `["."]`.
fn relative_segments(from: &Path, to: &Path) -> Option<Vec<String>> {
    if !from.has_root() || !to.has_root() {
        return None;
    }

    let from = normalize_path(from);
    let to = normalize_path(to);
    if prefix_of(&from) != prefix_of(&to) {
        return None;
    }

    let from_parts = normal_parts(&from);
    let to_parts = normal_parts(&to);
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| return a == b)
        .count();

    let ups = from_parts.len().saturating_sub(common);
    let mut segments: Vec<String> = std::iter::repeat_n("..".to_string(), ups).collect();
    segments.extend(to_parts.iter().skip(common).cloned());

    if segments.is_empty() {
        segments.push(".".to_string());
    }
    return Some(segments);
}

/// The Windows prefix component, if any.
fn prefix_of(path: &Path) -> Option<Component<'_>> {
    return path.components().find(|c| return matches!(c, Component::Prefix(_)));
}

/// Named components of an already normalized absolute path.
fn normal_parts(path: &Path) -> Vec<String> {
    return path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// `..` at the root stays at the root.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => {
            if matches!(components.last(), Some(Component::Normal(_))) {
                components.pop();
            } else if !matches!(components.last(), Some(Component::RootDir)) {
                components.push(component);
            }
        },
        other => components.push(other),
    }
}
