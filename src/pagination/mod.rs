//! List options for paginated endpoints.

use crate::errors::{CitbbsError, CitbbsResult};
use std::collections::BTreeMap;

/// Page size used by list operations unless overridden.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// A single list option.
///
/// Options are applied in order; a later option replaces an earlier one
/// that sets the same query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOption {
    /// Items per page (`per_page`).
    PerPage(u32),
    /// Page number (`page`).
    Page(u32),
    /// Cursor: return items after this one (`starting_after`).
    StartingAfter(String),
    /// Arbitrary query parameter.
    Param(String, String),
}

impl ListOption {
    fn key_value(&self) -> (&str, String) {
        match self {
            ListOption::PerPage(n) => ("per_page", n.to_string()),
            ListOption::Page(n) => ("page", n.to_string()),
            ListOption::StartingAfter(cursor) => ("starting_after", cursor.clone()),
            ListOption::Param(key, value) => (key.as_str(), value.clone()),
        }
    }
}

/// Query values for a list request, kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    values: BTreeMap<String, String>,
}

impl ListOptions {
    /// Creates empty list options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates list options with the given defaults applied.
    pub fn with_defaults(defaults: impl IntoIterator<Item = ListOption>) -> Self {
        let mut options = Self::new();
        options.apply_all(defaults);
        options
    }

    /// Applies a single option, replacing any existing value for its key.
    pub fn apply(&mut self, option: ListOption) {
        let (key, value) = option.key_value();
        self.values.insert(key.to_string(), value);
    }

    /// Applies options in order.
    pub fn apply_all(&mut self, options: impl IntoIterator<Item = ListOption>) {
        for option in options {
            self.apply(option);
        }
    }

    /// Gets a query value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns true if no values are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encodes the values as a URL query string, sorted by key.
    pub fn encode(&self) -> CitbbsResult<String> {
        serde_urlencoded::to_string(&self.values).map_err(|e| {
            CitbbsError::invalid_parameter(format!("Failed to encode list options: {}", e))
        })
    }

    /// Appends the encoded query to `path`, if there is one.
    pub fn append_to(&self, path: &str) -> CitbbsResult<String> {
        let query = self.encode()?;
        if query.is_empty() {
            Ok(path.to_string())
        } else {
            Ok(format!("{}?{}", path, query))
        }
    }
}
