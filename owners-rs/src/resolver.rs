//! The public coverage queries over an ownership index.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::index::OwnersIndex;
use crate::owner::Owner;
use crate::paths;
use crate::source::FileSource;

/// Answers ownership queries for sets of changed files: who could approve
/// them, and whether a proposed reviewer set already covers them.
///
/// One resolver is one resolution session. Policy files are read lazily
/// through the index, at most once per directory, and the accumulated state
/// is dropped with the resolver.
pub struct CoverageResolver<S> {
    index: OwnersIndex<S>,
}

impl<S: FileSource> CoverageResolver<S> {
    /// Create a resolver for the repository at `root`, reading policy files
    /// through `source`.
    pub fn new(root: impl Into<PathBuf>, source: S) -> Self {
        Self {
            index: OwnersIndex::new(root, source),
        }
    }

    /// A set of reviewers that covers every file: the union of the owners
    /// declared at each file's directory and at its ancestors up to the
    /// nearest inheritance boundary. Covering, not minimal; a smaller set
    /// may exist.
    pub fn reviewers_for<P: AsRef<str>>(&mut self, files: &[P]) -> Result<HashSet<Owner>> {
        check_paths(files)?;
        self.load_needed(files)?;

        let mut reviewers = HashSet::new();
        for file in files {
            let mut dir = paths::dirname(file.as_ref());
            loop {
                reviewers.extend(self.index.direct_owners(dir).cloned());
                if self.index.is_boundary(dir) {
                    break;
                }
                dir = paths::dirname(dir);
            }
        }
        Ok(reviewers)
    }

    /// Whether every file is covered by at least one of `reviewers`.
    pub fn files_are_covered_by<P, R>(&mut self, files: &[P], reviewers: &[R]) -> Result<bool>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        Ok(self.files_not_covered_by(files, reviewers)?.is_empty())
    }

    /// The files not covered by any of `reviewers`. A file is covered when
    /// some reviewer (or the wildcard) is declared at its directory or at
    /// an ancestor reachable without crossing an inheritance boundary. With
    /// no reviewers at all, every file is uncovered and nothing is loaded.
    pub fn files_not_covered_by<P, R>(
        &mut self,
        files: &[P],
        reviewers: &[R],
    ) -> Result<HashSet<String>>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        check_paths(files)?;
        let reviewers = check_reviewers(reviewers)?;
        if reviewers.is_empty() {
            return Ok(files.iter().map(|f| f.as_ref().to_string()).collect());
        }

        self.load_needed(files)?;
        let covered_dirs = self.index.dirs_owned_by(&reviewers);
        let mut uncovered = HashSet::new();
        for (dir, files_in_dir) in files_by_dir(files) {
            if !self.index.is_covered(&dir, &covered_dirs) {
                uncovered.extend(files_in_dir);
            }
        }
        Ok(uncovered)
    }

    fn load_needed<P: AsRef<str>>(&mut self, files: &[P]) -> Result<()> {
        for file in files {
            self.index.ensure_loaded(paths::dirname(file.as_ref()))?;
        }
        Ok(())
    }
}

// Both validations run over the whole input before any policy file is read,
// so a bad input fails the query without touching the index.

fn check_paths<P: AsRef<str>>(files: &[P]) -> Result<()> {
    for file in files {
        if !paths::is_under_root(file.as_ref()) {
            return Err(Error::InvalidPath(file.as_ref().to_string()));
        }
    }
    Ok(())
}

fn check_reviewers<R: AsRef<str>>(reviewers: &[R]) -> Result<HashSet<Owner>> {
    reviewers
        .iter()
        .map(|r| {
            Owner::parse(r.as_ref()).ok_or_else(|| Error::InvalidReviewer(r.as_ref().to_string()))
        })
        .collect()
}

fn files_by_dir<P: AsRef<str>>(files: &[P]) -> HashMap<String, Vec<String>> {
    let mut by_dir: HashMap<String, Vec<String>> = HashMap::new();
    for file in files {
        by_dir
            .entry(paths::dirname(file.as_ref()).to_string())
            .or_default()
            .push(file.as_ref().to_string());
    }
    by_dir
}
