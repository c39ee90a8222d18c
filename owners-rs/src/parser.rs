//! Parsing of a single directory's policy file.
//!
//! The format is line-oriented: blank lines and `#` comments are ignored,
//! `set noparent` blocks inheritance from ancestor directories, and every
//! other line must be an owner token (the `*` wildcard or an email-shaped
//! identifier). Anything else is a syntax error carrying the file path,
//! 1-based line number, and offending text.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::owner::Owner;

/// The directive blocking inheritance from ancestor directories.
const NOPARENT_DIRECTIVE: &str = "set noparent";

/// The parsed form of one directory's policy file: the owners declared
/// directly there, and whether the file blocks inheritance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyFile {
    pub owners: HashSet<Owner>,
    pub blocks_inheritance: bool,
}

/// Parse the line sequence of one policy file. `path` is used only for
/// error reporting. Parsing is all-or-nothing: a malformed line fails the
/// whole file, and owners from earlier lines are not returned.
pub fn parse_policy(lines: &[String], path: &Path) -> Result<PolicyFile> {
    let mut policy = PolicyFile::default();
    for (index, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == NOPARENT_DIRECTIVE {
            policy.blocks_inheritance = true;
            continue;
        }
        match Owner::parse(line) {
            Some(owner) => {
                policy.owners.insert(owner);
            }
            None => {
                return Err(Error::Syntax {
                    path: path.to_path_buf(),
                    line: index + 1,
                    text: line.to_string(),
                })
            }
        }
    }
    Ok(policy)
}
