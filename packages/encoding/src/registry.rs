//! Embedded category tables.
//!
//! Both tables are baked into the binary at compile time via
//! [`include_str!`] and parsed on first access. Their order must match the
//! encoding used when the model was trained.

use std::sync::LazyLock;

use crate::table::CategoryTable;

const WARD_TOML: &str = include_str!("../tables/ward.toml");
const COMMUNITY_AREA_TOML: &str = include_str!("../tables/community_area.toml");

static WARD_TABLE: LazyLock<CategoryTable> = LazyLock::new(|| parse_embedded("ward", WARD_TOML));

static COMMUNITY_AREA_TABLE: LazyLock<CategoryTable> =
    LazyLock::new(|| parse_embedded("community_area", COMMUNITY_AREA_TOML));

fn parse_embedded(name: &str, toml_str: &str) -> CategoryTable {
    let table = CategoryTable::from_toml(toml_str)
        .unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"));
    log::debug!(
        "Loaded category table '{}' v{} with {} entries",
        table.id(),
        table.version(),
        table.len()
    );
    table
}

/// The offense-type table behind the "Ward" field.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a build-time asset, covered by
/// tests).
#[must_use]
pub fn ward_table() -> &'static CategoryTable {
    &WARD_TABLE
}

/// The location-description table behind the "Community Area" field.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a build-time asset, covered by
/// tests).
#[must_use]
pub fn community_area_table() -> &'static CategoryTable {
    &COMMUNITY_AREA_TABLE
}

/// Both embedded tables, ward first.
#[must_use]
pub fn all_tables() -> [&'static CategoryTable; 2] {
    [ward_table(), community_area_table()]
}
