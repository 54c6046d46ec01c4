//! Slash-separated paths into the shared store tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Characters a hosted realtime tree refuses inside a key.
const ILLEGAL_SEGMENT_CHARS: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// The four independently subscribed subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreRoot {
    /// Voter identity → ballot.
    Votes,
    /// Category id → ordered submissions.
    UserSubmissions,
    /// Sanitized voter identity → presence entry.
    ActiveUsers,
    /// Ordered activity feed.
    Notifications,
}

impl StoreRoot {
    /// Every root, in namespace order.
    pub const ALL: [StoreRoot; 4] = [
        Self::Votes,
        Self::UserSubmissions,
        Self::ActiveUsers,
        Self::Notifications,
    ];

    /// The root's key in the tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Votes => "votes",
            Self::UserSubmissions => "userSubmissions",
            Self::ActiveUsers => "activeUsers",
            Self::Notifications => "notifications",
        }
    }
}

impl fmt::Display for StoreRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Replace characters that are illegal in a store key with `_`.
///
/// Control characters are replaced as well; an empty input becomes `_`.
pub fn sanitize_segment(raw: &str) -> String {
    if raw.is_empty() {
        return "_".to_string();
    }
    raw.chars()
        .map(|c| {
            if ILLEGAL_SEGMENT_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Whether `segment` can be used as a store key unchanged.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| ILLEGAL_SEGMENT_CHARS.contains(&c) || c.is_control())
}

/// A path into the store tree. The empty path addresses the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorePath(String);

impl StorePath {
    /// The path of the whole tree.
    pub fn tree() -> Self {
        Self(String::new())
    }

    /// The path of one of the four namespace roots.
    pub fn root(root: StoreRoot) -> Self {
        Self(root.as_str().to_string())
    }

    /// Parse a slash-separated path, rejecting illegal segments.
    ///
    /// Leading and trailing slashes are ignored.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::tree());
        }
        for segment in trimmed.split('/') {
            if !is_valid_segment(segment) {
                return Err(AppError::validation(format!(
                    "Invalid store path segment '{segment}' in '{raw}'"
                )));
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Append one child segment, sanitizing it first.
    pub fn child(&self, segment: &str) -> Self {
        let segment = sanitize_segment(segment);
        if self.0.is_empty() {
            Self(segment)
        } else {
            Self(format!("{}/{}", self.0, segment))
        }
    }

    /// The path as a string (no leading slash).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the whole-tree path.
    pub fn is_tree(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path's segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The final segment, if any.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }

    /// The parent path; the tree path has no parent.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        match self.0.rfind('/') {
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => Some(Self::tree()),
        }
    }

    /// Whether `self` equals `other` or contains it.
    pub fn is_ancestor_of(&self, other: &StorePath) -> bool {
        if self.0.is_empty() || self.0 == other.0 {
            return true;
        }
        other
            .0
            .strip_prefix(&self.0)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Whether one path contains the other.
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.is_ancestor_of(other) || other.is_ancestor_of(self)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

impl TryFrom<String> for StorePath {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StorePath> for String {
    fn from(value: StorePath) -> Self {
        value.0
    }
}
