//! Composite item keys: `<category id>-<item name>`.

use std::fmt;

use serde::{Deserialize, Serialize};

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::types::path::is_valid_segment;

/// Prefix that marks an item name as a user contribution.
pub const CONTRIBUTED_PREFIX: &str = "user-";

/// Whether an item comes from the catalog or from a submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemName {
    /// A catalog seed name.
    Seed(String),
    /// A user-submitted name, stored without the `user-` prefix.
    Contributed(String),
}

impl ItemName {
    /// The name shown to people (never carries the `user-` prefix).
    pub fn display_name(&self) -> &str {
        match self {
            Self::Seed(name) | Self::Contributed(name) => name,
        }
    }

    fn key_segment(&self) -> String {
        match self {
            Self::Seed(name) => name.clone(),
            Self::Contributed(name) => format!("{CONTRIBUTED_PREFIX}{name}"),
        }
    }
}

/// Globally unique identifier of a votable item.
///
/// Two submissions with the identical name in the same category share one
/// key, so their votes merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKey {
    category_id: String,
    name: ItemName,
}

impl ItemKey {
    /// Key of a catalog seed item.
    pub fn seed(category_id: &str, name: &str) -> Self {
        Self {
            category_id: category_id.to_string(),
            name: ItemName::Seed(name.to_string()),
        }
    }

    /// Key of a user-submitted item.
    pub fn contributed(category_id: &str, submitted_name: &str) -> Self {
        Self {
            category_id: category_id.to_string(),
            name: ItemName::Contributed(submitted_name.to_string()),
        }
    }

    /// Parse `<category>-<name>`, splitting at the first `-`.
    ///
    /// The whole key must be usable as a store key unchanged, otherwise the
    /// ballot entry written for it would come back under another name.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let (category_id, item) = raw
            .split_once('-')
            .ok_or_else(|| AppError::malformed(format!("Item key '{raw}' has no category")))?;

        if category_id.is_empty() || item.is_empty() {
            return Err(AppError::malformed(format!("Item key '{raw}' is incomplete")));
        }

        let name = match item.strip_prefix(CONTRIBUTED_PREFIX) {
            Some(submitted) if !submitted.is_empty() => ItemName::Contributed(submitted.to_string()),
            Some(_) => {
                return Err(AppError::malformed(format!(
                    "Item key '{raw}' has an empty contributed name"
                )));
            }
            None => ItemName::Seed(item.to_string()),
        };

        if !is_valid_segment(raw) {
            return Err(AppError::validation(format!(
                "Item key '{raw}' contains characters that cannot be stored"
            )));
        }

        Ok(Self {
            category_id: category_id.to_string(),
            name,
        })
    }

    /// The category this item belongs to.
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// The item name.
    pub fn name(&self) -> &ItemName {
        &self.name
    }

    /// Whether the item was submitted by a user.
    pub fn is_contributed(&self) -> bool {
        matches!(self.name, ItemName::Contributed(_))
    }

    /// The name shown to people.
    pub fn display_name(&self) -> &str {
        self.name.display_name()
    }

    /// Whether the key can be written as a ballot entry without rewriting.
    pub fn is_storable(&self) -> bool {
        is_valid_segment(&self.to_string())
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category_id, self.name.key_segment())
    }
}

impl TryFrom<String> for ItemKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemKey> for String {
    fn from(value: ItemKey) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_key_format() {
        assert_eq!(
            ItemKey::seed("hispanic", "ConversaFlow").to_string(),
            "hispanic-ConversaFlow"
        );
    }

    #[test]
    fn test_contributed_key_format() {
        let key = ItemKey::contributed("speed", "Rayo");
        assert_eq!(key.to_string(), "speed-user-Rayo");
        assert_eq!(key.display_name(), "Rayo");
        assert!(key.is_contributed());
    }

    #[test]
    fn test_parse_keeps_hyphens_in_name() {
        let key = ItemKey::parse("value_es-ROI-Matic").unwrap();
        assert_eq!(key.category_id(), "value_es");
        assert_eq!(key.name(), &ItemName::Seed("ROI-Matic".to_string()));
    }

    #[test]
    fn test_parse_contributed() {
        let key = ItemKey::parse("modular-user-Multi-Flow").unwrap();
        assert_eq!(key, ItemKey::contributed("modular", "Multi-Flow"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ItemKey::parse("nocategory").is_err());
        assert!(ItemKey::parse("-Name").is_err());
        assert!(ItemKey::parse("speed-").is_err());
        assert!(ItemKey::parse("speed-user-").is_err());
    }

    #[test]
    fn test_parse_rejects_unstorable_names() {
        let err = ItemKey::parse("speed-Turbo.X").unwrap_err();
        assert_eq!(err.kind, votehub_core::error::ErrorKind::Validation);
        assert!(ItemKey::parse("speed-user-a#b").is_err());
        assert!(ItemKey::parse("speed-a/b").is_err());
        assert!(!ItemKey::seed("speed", "Turbo.X").is_storable());
        assert!(ItemKey::seed("speed", "TurboFlow").is_storable());
    }

    #[test]
    fn test_serde_as_string() {
        let key = ItemKey::seed("speed", "TurboFlow");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"speed-TurboFlow\"");
        let back: ItemKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
