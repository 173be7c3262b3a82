//! Ordered category tables.
//!
//! A [`CategoryTable`] assigns each name the integer code equal to its
//! position in the table. Tables are parsed from TOML and validated once;
//! after construction they are read-only.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while constructing a [`CategoryTable`].
#[derive(Debug, Error)]
pub enum CategoryTableError {
    /// The TOML document could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The table has no entries.
    #[error("table '{id}' has no entries")]
    Empty {
        /// Table identifier.
        id: String,
    },

    /// An entry is the empty string.
    #[error("table '{id}' has an empty name at position {position}")]
    EmptyName {
        /// Table identifier.
        id: String,
        /// Position of the empty entry.
        position: usize,
    },

    /// A name appears more than once.
    #[error("table '{id}' lists '{name}' at positions {first} and {second}")]
    Duplicate {
        /// Table identifier.
        id: String,
        /// The repeated name.
        name: String,
        /// Position of the first occurrence.
        first: u32,
        /// Position of the repeated occurrence.
        second: usize,
    },

    /// The table has more entries than a code can address.
    #[error("table '{id}' has {len} entries, more than a code can address")]
    TooLarge {
        /// Table identifier.
        id: String,
        /// Number of entries.
        len: usize,
    },
}

/// On-disk shape of a table definition.
#[derive(Debug, Deserialize)]
struct CategoryTableDef {
    id: String,
    label: String,
    version: u32,
    names: Vec<String>,
}

/// An ordered list of category names whose positions are their codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    id: String,
    label: String,
    version: u32,
    names: Vec<String>,
    codes: BTreeMap<String, u32>,
}

impl CategoryTable {
    /// Builds a table from names in code order.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is empty, contains an empty or
    /// duplicated name, or has more entries than fit in a `u32` code.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        version: u32,
        names: Vec<String>,
    ) -> Result<Self, CategoryTableError> {
        let id = id.into();

        if names.is_empty() {
            return Err(CategoryTableError::Empty { id });
        }
        if u32::try_from(names.len()).is_err() {
            return Err(CategoryTableError::TooLarge {
                id,
                len: names.len(),
            });
        }

        let mut codes = BTreeMap::new();
        for (position, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(CategoryTableError::EmptyName { id, position });
            }
            // Length was checked above, so every position fits.
            let code = u32::try_from(position).unwrap_or(u32::MAX);
            if let Some(first) = codes.insert(name.clone(), code) {
                return Err(CategoryTableError::Duplicate {
                    id,
                    name: name.clone(),
                    first,
                    second: position,
                });
            }
        }

        Ok(Self {
            id,
            label: label.into(),
            version,
            names,
            codes,
        })
    }

    /// Parses and validates a table from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the table fails the
    /// checks in [`CategoryTable::new`].
    pub fn from_toml(toml_str: &str) -> Result<Self, CategoryTableError> {
        let def: CategoryTableDef = toml::de::from_str(toml_str)?;
        Self::new(def.id, def.label, def.version, def.names)
    }

    /// Machine identifier, e.g. `ward`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable field label, e.g. `Community Area`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Table version. Bumped whenever entries are appended.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; empty tables are rejected at construction.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in code order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks up the code for `name` by exact match.
    #[must_use]
    pub fn code_for(&self, name: &str) -> Option<u32> {
        self.codes.get(name).copied()
    }

    /// Returns the name at position `code`.
    #[must_use]
    pub fn name_for(&self, code: u32) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Iterates `(code, name)` pairs in code order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &str)> {
        (0..).zip(self.names.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn codes_follow_insertion_order() {
        let table = CategoryTable::new("t", "T", 1, names(&["B", "A", "C"])).unwrap();
        assert_eq!(table.code_for("B"), Some(0));
        assert_eq!(table.code_for("A"), Some(1));
        assert_eq!(table.code_for("C"), Some(2));
        assert_eq!(table.name_for(1), Some("A"));
        assert_eq!(table.name_for(3), None);
    }

    #[test]
    fn lookup_is_exact() {
        let table = CategoryTable::new("t", "T", 1, names(&["THEFT"])).unwrap();
        assert_eq!(table.code_for("theft"), None);
        assert_eq!(table.code_for(" THEFT"), None);
        assert_eq!(table.code_for("THEFT"), Some(0));
    }

    #[test]
    fn rejects_duplicates() {
        let err = CategoryTable::new("t", "T", 1, names(&["A", "B", "A"])).unwrap_err();
        match err {
            CategoryTableError::Duplicate {
                name,
                first,
                second,
                ..
            } => {
                assert_eq!(name, "A");
                assert_eq!(first, 0);
                assert_eq!(second, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_table_and_empty_names() {
        assert!(matches!(
            CategoryTable::new("t", "T", 1, Vec::new()),
            Err(CategoryTableError::Empty { .. })
        ));
        assert!(matches!(
            CategoryTable::new("t", "T", 1, names(&["A", ""])),
            Err(CategoryTableError::EmptyName { position: 1, .. })
        ));
    }

    #[test]
    fn parses_toml_definition() {
        let toml_str = r#"
            id = "colors"
            label = "Colors"
            version = 3
            names = ["RED", "GREEN"]
        "#;
        let table = CategoryTable::from_toml(toml_str).unwrap();
        assert_eq!(table.id(), "colors");
        assert_eq!(table.label(), "Colors");
        assert_eq!(table.version(), 3);
        assert_eq!(table.len(), 2);
        let entries: Vec<(u32, &str)> = table.entries().collect();
        assert_eq!(entries, vec![(0, "RED"), (1, "GREEN")]);
    }

    #[test]
    fn rejects_toml_missing_version() {
        let toml_str = r#"
            id = "colors"
            label = "Colors"
            names = ["RED"]
        "#;
        assert!(matches!(
            CategoryTable::from_toml(toml_str),
            Err(CategoryTableError::Toml(_))
        ));
    }
}
