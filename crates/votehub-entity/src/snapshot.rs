//! Result of decoding a whole-subtree snapshot.

/// A decoded snapshot plus the child keys that were rejected as malformed.
///
/// A single bad child never blanks the whole view; it is dropped and
/// reported here so the caller can log it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded<T> {
    /// The well-formed part of the snapshot.
    pub value: T,
    /// Keys (or `parent/child` paths) of rejected children.
    pub rejected: Vec<String>,
}

impl<T> Decoded<T> {
    /// A snapshot with no rejected children.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            rejected: Vec::new(),
        }
    }

    /// Whether any child was rejected.
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}
