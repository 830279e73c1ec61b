//! Index and constraint definitions.

/// Kind of index definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Primary key.
    Primary,
    /// Unique constraint.
    Unique,
    /// Plain secondary index.
    Index,
}

impl IndexKind {
    /// Suffix used when deriving a default name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Unique => "unique",
            Self::Index => "index",
        }
    }
}

/// A PRIMARY, UNIQUE or INDEX definition over an ordered column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Explicit name, if one was given.
    pub name: Option<String>,
    /// Column names; order defines the key order.
    pub columns: Vec<String>,
    /// Kind of index.
    pub kind: IndexKind,
}

impl IndexDefinition {
    /// Returns the explicit name or the conventional
    /// `<table>_<col1>_<col2>_<suffix>` name.
    #[must_use]
    pub fn name_for(&self, table: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| index_name(table, &self.columns, self.kind.suffix()))
    }
}

/// Derives `<table>_<col1>_..._<suffix>`.
///
/// Drop commands rely on this convention to find indexes and constraints
/// created by this crate; differently named objects are not found.
#[must_use]
pub fn index_name<S: AsRef<str>>(table: &str, columns: &[S], suffix: &str) -> String {
    let mut name = String::from(table);
    for column in columns {
        name.push('_');
        name.push_str(column.as_ref());
    }
    name.push('_');
    name.push_str(suffix);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name() {
        assert_eq!(index_name("users", &["email"], "index"), "users_email_index");
        assert_eq!(
            index_name("order_items", &["order_id", "product_id"], "unique"),
            "order_items_order_id_product_id_unique"
        );
    }

    #[test]
    fn test_name_for_prefers_explicit_name() {
        let idx = IndexDefinition {
            name: Some("idx_email".to_string()),
            columns: vec!["email".to_string()],
            kind: IndexKind::Index,
        };
        assert_eq!(idx.name_for("users"), "idx_email");

        let idx = IndexDefinition {
            name: None,
            ..idx
        };
        assert_eq!(idx.name_for("users"), "users_email_index");
    }
}
