//! Filename to location lookup over the whole corpus.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Maps a bare filename (extension included, case-sensitive) to every
/// location in the corpus that carries it, in the order they were supplied.
///
/// Built once per run; there is no way to mutate it afterwards.
#[derive(Debug, Default, Clone)]
pub struct FileIndex {
    /// Bare filename to absolute locations, insertion-ordered per key.
    entries: HashMap<String, Vec<PathBuf>>,
}

impl FileIndex {
    /// Index every location under its final path component.
    ///
    /// Same-named files in different directories are all kept; the resolver
    /// disambiguates them per link. Locations without a final component
    /// (such as `/`) are skipped.
    pub fn build<I, P>(locations: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut entries: HashMap<String, Vec<PathBuf>> = HashMap::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for location in locations {
            let location: PathBuf = location.into();
            let Some(filename) = bare_filename(&location) else {
                continue;
            };
            if seen.insert(location.clone()) {
                entries.entry(filename).or_default().push(location);
            }
        }

        return Self { entries };
    }

    /// Every location indexed under `filename`, in insertion order.
    pub fn entries_for(&self, filename: &str) -> &[PathBuf] {
        return self.entries.get(filename).map(Vec::as_slice).unwrap_or(&[]);
    }

    /// Whether `filename` was ever indexed.
    pub fn contains(&self, filename: &str) -> bool {
        return self.entries.contains_key(filename);
    }

    /// Number of distinct filenames.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// True when no location was indexed.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

/// Final path component as an owned string.
pub fn bare_filename(path: &Path) -> Option<String> {
    return path.file_name().map(|name| return name.to_string_lossy().into_owned());
}
