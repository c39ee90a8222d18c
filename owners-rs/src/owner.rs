use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// The wildcard token: when declared in a policy file, anyone may approve.
pub const EVERYONE: &str = "*";

// Loose `local@domain` shape. Policy files only need enough validation to
// catch typos; nothing stricter is attempted.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\-+%.]+@[\w\-+%.]+$").unwrap());

/// An identifier authorized to approve changes: a specific reviewer's email
/// address, or the wildcard meaning any reviewer is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The `*` token.
    Everyone,
    /// An email-shaped identifier such as `alice@example.com`.
    Email(String),
}

impl Owner {
    /// Parse an owner token. Returns `None` when the token is neither the
    /// wildcard nor email-shaped.
    pub fn parse(token: &str) -> Option<Owner> {
        if token == EVERYONE {
            Some(Owner::Everyone)
        } else if EMAIL_PATTERN.is_match(token) {
            Some(Owner::Email(token.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Owner::Everyone => EVERYONE,
            Owner::Email(email) => email,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
