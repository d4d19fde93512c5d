//! Redb table definitions.

use redb::TableDefinition;

/// The physical table that stores all preference entries.
///
/// Keys are the dotted tags; values are encoded [`StoredValue`](crate::StoredValue)s.
pub const PREFS_TABLE: TableDefinition<'static, &str, &[u8]> = TableDefinition::new("flatprefs");
