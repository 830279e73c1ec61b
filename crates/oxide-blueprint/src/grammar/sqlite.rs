//! SQLite grammar.
//!
//! SQLite cannot change a column's type, nullability or default in place, and
//! its inline UNIQUE constraints are backed by auto-generated index names.
//! Those alterations fail to compile instead of producing SQL that would
//! silently do nothing.

use super::Grammar;
use crate::column::{ColumnChange, ColumnDefinition, ColumnType};
use crate::dialect::Dialect;
use crate::error::Result;

/// SQLite grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteGrammar;

impl SqliteGrammar {
    /// Creates a new SQLite grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Grammar for SqliteGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn map_type(&self, column_type: ColumnType) -> String {
        match column_type {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::String { length } => format!("VARCHAR({length})"),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
        }
    }

    fn boolean_literals(&self) -> (&'static str, &'static str) {
        ("1", "0")
    }

    fn column_clause(&self, column: &ColumnDefinition, inline_primary: bool) -> String {
        let mut sql = self.quote_identifier(&column.name);
        sql.push(' ');

        // AUTOINCREMENT is only accepted on an INTEGER PRIMARY KEY.
        let has_primary_clause = if column.is_serial() {
            sql.push_str("INTEGER PRIMARY KEY AUTOINCREMENT");
            true
        } else {
            sql.push_str(&self.map_type(column.column_type));
            if inline_primary && column.primary {
                sql.push_str(" PRIMARY KEY");
            }
            inline_primary && column.primary
        };

        if !column.nullable && !has_primary_clause {
            sql.push_str(" NOT NULL");
        }
        if column.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(ref default) = column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_default(default));
        }
        if let Some(ref fk) = column.references {
            sql.push_str(&self.references_clause(fk));
        }
        sql
    }

    fn compile_modify(&self, table: &str, _change: &ColumnChange) -> Result<String> {
        Err(self.unsupported("modify column", table))
    }

    fn compile_drop_unique(&self, table: &str, _columns: &[String]) -> Result<String> {
        Err(self.unsupported("drop unique", table))
    }

    fn compile_drop_primary(&self, table: &str) -> Result<String> {
        Err(self.unsupported("drop primary", table))
    }

    fn compile_table_exists(&self, table: &str) -> String {
        format!(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = {}",
            self.quote_string(table)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::Blueprint;
    use crate::error::GrammarError;

    fn grammar() -> SqliteGrammar {
        SqliteGrammar::new()
    }

    #[test]
    fn test_sqlite_types() {
        let g = grammar();
        assert_eq!(g.map_type(ColumnType::Integer), "INTEGER");
        assert_eq!(g.map_type(ColumnType::BigInteger), "BIGINT");
        assert_eq!(g.map_type(ColumnType::string(None)), "VARCHAR(255)");
        assert_eq!(g.map_type(ColumnType::DateTime), "DATETIME");
        assert_eq!(
            g.map_type(ColumnType::Decimal {
                precision: 10,
                scale: 2
            }),
            "DECIMAL(10, 2)"
        );
    }

    #[test]
    fn test_auto_increment_key() {
        let mut bp = Blueprint::create("users");
        bp.id();
        assert_eq!(
            grammar().compile_create(&bp),
            "CREATE TABLE \"users\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT)"
        );
    }

    #[test]
    fn test_inline_primary_key_omits_not_null() {
        let mut bp = Blueprint::create("codes");
        bp.string("code", 10).primary();
        assert_eq!(
            grammar().compile_create(&bp),
            "CREATE TABLE \"codes\" (\"code\" VARCHAR(10) PRIMARY KEY)"
        );
    }

    #[test]
    fn test_boolean_default() {
        let mut bp = Blueprint::create("users");
        bp.boolean("active").default(true);
        bp.boolean("banned").default(false);
        assert_eq!(
            grammar().compile_create(&bp),
            "CREATE TABLE \"users\" (\"active\" BOOLEAN NOT NULL DEFAULT 1, \
             \"banned\" BOOLEAN NOT NULL DEFAULT 0)"
        );
    }

    #[test]
    fn test_modify_is_unsupported() {
        let mut bp = Blueprint::alter("users");
        bp.modify_column("status").string(50).default("active");

        let err = grammar().compile_alter(&bp).unwrap_err();
        assert_eq!(
            err,
            GrammarError::Unsupported {
                dialect: Dialect::Sqlite,
                operation: "modify column",
                table: "users".to_string(),
            }
        );
    }

    #[test]
    fn test_drop_unique_and_primary_are_unsupported() {
        let mut bp = Blueprint::alter("users");
        bp.drop_unique(&["email"]);
        assert!(grammar().compile_alter(&bp).is_err());

        let mut bp = Blueprint::alter("users");
        bp.drop_primary();
        assert!(grammar().compile_alter(&bp).is_err());
    }

    #[test]
    fn test_table_exists_query() {
        assert_eq!(
            grammar().compile_table_exists("users"),
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'"
        );
    }
}
