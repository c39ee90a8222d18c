//! The ownership index: lazily loaded per-directory policy records and the
//! upward directory-chain walk.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::owner::Owner;
use crate::parser::{self, PolicyFile};
use crate::paths;
use crate::source::FileSource;

/// Conventional name of the per-directory policy file.
pub const OWNERS_FILE: &str = "OWNERS";

/// A lazily populated index of policy records for one repository.
///
/// Directories are identified by `/`-separated paths relative to the
/// repository root; `""` is the root itself. Each directory's record is
/// loaded at most once and never mutated afterwards, so the index only
/// grows over its lifetime. One index serves one resolution session:
/// nothing is persisted, and a policy file edited mid-session is not
/// observed.
pub struct OwnersIndex<S> {
    root: PathBuf,
    source: S,
    // Owner -> directories where that owner is declared directly. The
    // wildcard entry always exists.
    owned_by: HashMap<Owner, HashSet<String>>,
    // Directory -> owners declared directly there. Present-but-empty means
    // loaded with no direct owners; absent means not yet loaded.
    owners_for: HashMap<String, HashSet<Owner>>,
    // Directories that stop the upward walk. Holds the root from the start.
    boundaries: HashSet<String>,
}

impl<S: FileSource> OwnersIndex<S> {
    /// Create an empty index for the repository at `root`, reading policy
    /// files through `source`.
    pub fn new(root: impl Into<PathBuf>, source: S) -> Self {
        Self {
            root: root.into(),
            source,
            owned_by: HashMap::from([(Owner::Everyone, HashSet::new())]),
            owners_for: HashMap::new(),
            boundaries: HashSet::from([String::new()]),
        }
    }

    /// Load policy records for every directory from `dir` up to and
    /// including its nearest inheritance boundary. Directories already
    /// loaded are not re-read, and the walk stops early when it meets one:
    /// a loaded directory's chain up to its boundary is already complete.
    pub fn ensure_loaded(&mut self, dir: &str) -> Result<()> {
        let mut dir = dir;
        while !self.owners_for.contains_key(dir) {
            self.load_dir(dir)?;
            if self.is_boundary(dir) {
                break;
            }
            dir = paths::dirname(dir);
        }
        Ok(())
    }

    /// Whether the upward walk stops at `dir`: the root, or any directory
    /// whose policy file declares `set noparent`.
    pub fn is_boundary(&self, dir: &str) -> bool {
        self.boundaries.contains(dir)
    }

    /// The owners declared directly in `dir`. Empty for directories without
    /// a policy file, and for directories `ensure_loaded` has not covered.
    pub fn direct_owners(&self, dir: &str) -> impl Iterator<Item = &Owner> {
        self.owners_for.get(dir).into_iter().flatten()
    }

    /// The directories owned directly by any of `reviewers`, plus every
    /// directory the wildcard owner covers.
    pub fn dirs_owned_by<'a>(
        &self,
        reviewers: impl IntoIterator<Item = &'a Owner>,
    ) -> HashSet<String> {
        let mut dirs = self
            .owned_by
            .get(&Owner::Everyone)
            .cloned()
            .unwrap_or_default();
        for reviewer in reviewers {
            if let Some(owned) = self.owned_by.get(reviewer) {
                dirs.extend(owned.iter().cloned());
            }
        }
        dirs
    }

    /// Whether `dir` or an ancestor reachable without crossing an
    /// inheritance boundary is a member of `covered_dirs`. Only accurate
    /// once `ensure_loaded(dir)` has run, since boundaries are discovered
    /// while loading.
    pub fn is_covered(&self, dir: &str, covered_dirs: &HashSet<String>) -> bool {
        let mut dir = dir;
        while !covered_dirs.contains(dir) && !self.is_boundary(dir) {
            dir = paths::dirname(dir);
        }
        covered_dirs.contains(dir)
    }

    fn load_dir(&mut self, dir: &str) -> Result<()> {
        let policy = self.read_policy(dir)?;
        let mut direct = HashSet::new();
        if let Some(policy) = policy {
            if policy.blocks_inheritance {
                self.boundaries.insert(dir.to_string());
            }
            for owner in policy.owners {
                self.owned_by
                    .entry(owner.clone())
                    .or_default()
                    .insert(dir.to_string());
                direct.insert(owner);
            }
        }
        tracing::debug!(dir, owners = direct.len(), "loaded policy record");
        self.owners_for.insert(dir.to_string(), direct);
        Ok(())
    }

    fn read_policy(&self, dir: &str) -> Result<Option<PolicyFile>> {
        let path = if dir.is_empty() {
            self.root.join(OWNERS_FILE)
        } else {
            self.root.join(dir).join(OWNERS_FILE)
        };
        if !self.source.exists(&path) {
            return Ok(None);
        }
        let lines = self.source.read_lines(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        parser::parse_policy(&lines, &path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryFileSource;

    fn index_for(files: &[(&str, &str)]) -> OwnersIndex<MemoryFileSource> {
        let mut source = MemoryFileSource::new();
        for (dir, contents) in files {
            let path = if dir.is_empty() {
                format!("/repo/{}", OWNERS_FILE)
            } else {
                format!("/repo/{}/{}", dir, OWNERS_FILE)
            };
            source.insert(path, *contents);
        }
        OwnersIndex::new("/repo", source)
    }

    fn owner(token: &str) -> Owner {
        Owner::parse(token).expect("fixture owner must parse")
    }

    // `owned_by[o]` contains `d` exactly when `o` is in `owners_for[d]`.
    fn assert_consistent(index: &OwnersIndex<MemoryFileSource>) {
        for (o, dirs) in &index.owned_by {
            for dir in dirs {
                assert!(
                    index.owners_for[dir].contains(o),
                    "owned_by[{}] lists {} but owners_for disagrees",
                    o,
                    dir
                );
            }
        }
        for (dir, owners) in &index.owners_for {
            for o in owners {
                assert!(
                    index.owned_by[o].contains(dir),
                    "owners_for[{}] lists {} but owned_by disagrees",
                    dir,
                    o
                );
            }
        }
    }

    #[test]
    fn loads_chain_up_to_root() {
        let mut index = index_for(&[("a", "alice@example.com")]);
        index.ensure_loaded("a/b/c").unwrap();

        // Every directory on the chain has an entry, even without a file.
        for dir in ["a/b/c", "a/b", "a", ""] {
            assert!(index.owners_for.contains_key(dir), "missing entry for `{}`", dir);
        }
        assert_eq!(
            index.direct_owners("a").cloned().collect::<Vec<_>>(),
            vec![owner("alice@example.com")]
        );
        assert_eq!(index.direct_owners("a/b").count(), 0);
        assert_consistent(&index);
    }

    #[test]
    fn loading_stops_at_noparent_boundary() {
        let mut index = index_for(&[
            ("a", "alice@example.com"),
            ("a/b", "set noparent\nbob@example.com"),
        ]);
        index.ensure_loaded("a/b").unwrap();

        assert!(index.is_boundary("a/b"));
        assert!(index.owners_for.contains_key("a/b"));
        // The boundary is loaded; nothing above it is.
        assert!(!index.owners_for.contains_key("a"));
        assert_consistent(&index);
    }

    #[test]
    fn loading_is_idempotent() {
        let mut index = index_for(&[("a", "alice@example.com\nalice@example.com")]);
        index.ensure_loaded("a").unwrap();
        index.ensure_loaded("a").unwrap();
        index.ensure_loaded("a/b").unwrap();

        assert_eq!(index.direct_owners("a").count(), 1);
        assert_eq!(index.owned_by[&owner("alice@example.com")].len(), 1);
        assert_consistent(&index);
    }

    #[test]
    fn syntax_error_commits_nothing() {
        // Directory loads are all-or-nothing: a bad line on line 2 must not
        // leave the line-1 owner behind in either map.
        let mut index = index_for(&[("a", "alice@example.com\nnot-an-email")]);
        let err = index.ensure_loaded("a").unwrap_err();

        assert!(matches!(err, Error::Syntax { line: 2, .. }));
        assert!(!index.owners_for.contains_key("a"));
        assert!(!index.owned_by.contains_key(&owner("alice@example.com")));
        assert_consistent(&index);
    }

    #[test]
    fn dirs_owned_by_always_includes_wildcard_dirs() {
        let mut index = index_for(&[("", "*"), ("a", "alice@example.com")]);
        index.ensure_loaded("a").unwrap();

        let dirs = index.dirs_owned_by(&[owner("bob@example.com")]);
        assert_eq!(dirs, HashSet::from(["".to_string()]));

        let dirs = index.dirs_owned_by(&[owner("alice@example.com")]);
        assert_eq!(dirs, HashSet::from(["".to_string(), "a".to_string()]));
    }

    #[test]
    fn coverage_walk_respects_boundaries() {
        let mut index = index_for(&[("a/b", "set noparent\nbob@example.com")]);
        index.ensure_loaded("a/b/c").unwrap();

        let at_root = HashSet::from(["".to_string()]);
        let at_boundary = HashSet::from(["a/b".to_string()]);

        // The boundary blocks inherited coverage from the root...
        assert!(!index.is_covered("a/b/c", &at_root));
        // ...but coverage declared at the boundary itself still counts.
        assert!(index.is_covered("a/b/c", &at_boundary));
        assert!(index.is_covered("a/other", &at_root));
    }
}
