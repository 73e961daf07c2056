// ── Origin identifiers ──
//
// Every node in a materialized tree is keyed by the identifier the row
// source assigned to it (a database primary key). The value is opaque:
// it is compared and hashed exactly as read, never normalized.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for an inventory entity.
///
/// An integer key or a string key, kept verbatim. Two string keys that
/// differ only in case or spelling (`"ABC"` vs `"abc"`) are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(i64),
    Key(String),
}

impl EntityId {
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Key(_) => None,
        }
    }

    /// The key's text form: the string as read, or the integer in decimal.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Numeric(n) => Cow::Owned(n.to_string()),
            Self::Key(s) => Cow::Borrowed(s),
        }
    }

    /// Whether two ids spell the same key. Command-line ids arrive as text,
    /// so `4` typed on the command line matches both `4` and `"4"` in a dump.
    pub fn same_text(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a == b,
            (Self::Key(a), Self::Key(b)) => a == b,
            _ => self.as_text() == other.as_text(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Key(s) => f.write_str(s),
        }
    }
}

/// Parses user-supplied ids (command-line flags) verbatim.
impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::Key(s.to_owned()))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::Key(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Key(s.to_owned())
    }
}
