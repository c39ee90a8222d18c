//! Resolve code-review ownership from per-directory `OWNERS` files.
//!
//! A repository's directories may each carry an `OWNERS` policy file naming
//! the people who can approve changes beneath them. Ownership is inherited
//! from the nearest ancestor directory that declares owners, unless a file
//! blocks inheritance with `set noparent`. Given a set of changed files,
//! [`CoverageResolver`] suggests a reviewer set that covers them all, and
//! checks whether a proposed reviewer set already does.
//!
//! Policy files are read lazily through a [`FileSource`], at most once per
//! directory per resolver.

mod error;
mod index;
mod owner;
pub mod parser;
mod paths;
mod resolver;
mod source;

use std::path::Path;

pub use error::{Error, Result};
pub use index::{OwnersIndex, OWNERS_FILE};
pub use owner::{Owner, EVERYONE};
pub use parser::PolicyFile;
pub use resolver::CoverageResolver;
pub use source::{FileSource, MemoryFileSource, OsFileSource};

/// Create a resolver for the repository rooted at `path`, reading policy
/// files from the local filesystem.
pub fn from_root(path: impl AsRef<Path>) -> CoverageResolver<OsFileSource> {
    CoverageResolver::new(path.as_ref(), OsFileSource)
}
