//! Category and catalog value objects.

use serde::{Deserialize, Serialize};

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::types::path::is_valid_segment;

use crate::item::{CONTRIBUTED_PREFIX, ItemKey};

/// One votable category with its seed names, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id, used as the item key prefix.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display subtitle.
    pub subtitle: String,
    /// Seed item names.
    pub seed_names: Vec<String>,
}

impl Category {
    /// Create a category.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        seed_names: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            seed_names: seed_names.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Item keys of every seed name, in catalog order.
    pub fn seed_keys(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.seed_names
            .iter()
            .map(|name| ItemKey::seed(&self.id, name))
    }
}

/// The immutable set of categories shared by every component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub(super) categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog, checking the item key invariants:
    ///
    /// - category ids are unique, non-empty, contain no `-` and are valid store keys
    /// - seed names are non-empty, valid store keys, and never start with `user-`
    pub fn new(categories: Vec<Category>) -> AppResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for category in &categories {
            if category.id.contains('-') || !is_valid_segment(&category.id) {
                return Err(AppError::validation(format!(
                    "Invalid category id '{}'",
                    category.id
                )));
            }
            if !seen.insert(category.id.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate category id '{}'",
                    category.id
                )));
            }
            for name in &category.seed_names {
                if name.starts_with(CONTRIBUTED_PREFIX) || !is_valid_segment(name) {
                    return Err(AppError::validation(format!(
                        "Invalid seed name '{name}' in category '{}'",
                        category.id
                    )));
                }
            }
        }
        Ok(Self { categories })
    }

    /// Look up a category by id.
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a category, failing with `UnknownCategory`.
    pub fn require(&self, id: &str) -> AppResult<&Category> {
        self.get(id).ok_or_else(|| AppError::unknown_category(id))
    }

    /// Whether the catalog defines `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
