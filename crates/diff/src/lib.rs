//! File-set diffing: classifies each path as added, removed or updated
//! between two known project states.
//!
//! Comparison is by checksum only, never mtime or size, so clock skew
//! between machines can't produce false positives. The differ is a pure
//! function: identical inputs always produce identical results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use fieldsync_protocol::FileSet;

/// Suffixes excluded from added/removed classification by default:
/// database sidecars, editor/backup droppings and compiled artifacts.
pub const DEFAULT_IGNORE_SUFFIXES: &[&str] = &[
    "-wal", "-shm", "-journal", ".lock", ".bak", ".tmp", ".swp", ".pyc",
];

/// Which path suffixes are excluded from added/removed classification.
///
/// A plain suffix-set membership test, deliberately not a pattern
/// engine: lookups stay cheap and the configured set is inspectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePolicy {
    suffixes: BTreeSet<String>,
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_SUFFIXES.iter().map(|s| s.to_string()))
    }
}

impl IgnorePolicy {
    /// Builds a policy from an explicit suffix collection.
    pub fn new(suffixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            suffixes: suffixes.into_iter().collect(),
        }
    }

    /// An empty policy that ignores nothing.
    pub fn none() -> Self {
        Self {
            suffixes: BTreeSet::new(),
        }
    }

    /// Returns `true` if `path` ends with any configured suffix.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.suffixes.iter().any(|s| path.ends_with(s.as_str()))
    }

    /// The configured suffixes.
    pub fn suffixes(&self) -> &BTreeSet<String> {
        &self.suffixes
    }
}

/// Classification of the paths that differ between two file sets.
///
/// Derived, never persisted; recompute whenever either side changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub updated: BTreeSet<String>,
    /// Always `added.len() + removed.len() + updated.len()`.
    pub changes: usize,
}

impl DiffResult {
    /// Returns `true` when the diff is a no-op.
    pub fn is_empty(&self) -> bool {
        self.changes == 0
    }
}

/// Compares a previously known file listing against a newly proposed
/// one.
///
/// - `removed`: paths in `old` absent from `new`, minus ignored paths.
/// - `added`: paths in `new` absent from `old`, minus ignored paths.
/// - `updated`: paths in both whose checksum differs.
pub fn diff_file_sets(old: &FileSet, new: &FileSet, policy: &IgnorePolicy) -> DiffResult {
    let mut added = BTreeSet::new();
    let mut removed = BTreeSet::new();
    let mut updated = BTreeSet::new();

    for (path, old_info) in old {
        match new.get(path) {
            None => {
                if !policy.is_ignored(path) {
                    removed.insert(path.clone());
                }
            }
            Some(new_info) => {
                if new_info.checksum != old_info.checksum {
                    updated.insert(path.clone());
                }
            }
        }
    }

    for path in new.keys() {
        if !old.contains_key(path) && !policy.is_ignored(path) {
            added.insert(path.clone());
        }
    }

    let changes = added.len() + removed.len() + updated.len();
    DiffResult {
        added,
        removed,
        updated,
        changes,
    }
}
