//! PostgreSQL grammar.

use super::Grammar;
use crate::column::{ColumnChange, ColumnDefinition, ColumnType};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::index::{IndexKind, index_name};

/// PostgreSQL grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresGrammar;

impl PostgresGrammar {
    /// Creates a new PostgreSQL grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Grammar for PostgresGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn map_type(&self, column_type: ColumnType) -> String {
        match column_type {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::String { length } => format!("VARCHAR({length})"),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
            ColumnType::Float => "DOUBLE PRECISION".to_string(),
            ColumnType::DateTime | ColumnType::Timestamp => "TIMESTAMP".to_string(),
        }
    }

    fn boolean_literals(&self) -> (&'static str, &'static str) {
        ("true", "false")
    }

    fn column_clause(&self, column: &ColumnDefinition, inline_primary: bool) -> String {
        // SERIAL/BIGSERIAL stand in for auto-increment and imply NOT NULL.
        let data_type = match column.column_type {
            ColumnType::Integer if column.is_serial() => "SERIAL".to_string(),
            ColumnType::BigInteger if column.is_serial() => "BIGSERIAL".to_string(),
            other => self.map_type(other),
        };

        let mut sql = format!("{} {}", self.quote_identifier(&column.name), data_type);

        if inline_primary && column.primary {
            sql.push_str(" PRIMARY KEY");
        }
        if !column.nullable && !column.is_serial() {
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

    fn compile_modify(&self, table: &str, change: &ColumnChange) -> Result<String> {
        let prefix = format!(
            "ALTER TABLE {} ALTER COLUMN {}",
            self.quote_identifier(table),
            self.quote_identifier(&change.name)
        );

        let mut parts = Vec::with_capacity(3);
        if let Some(column_type) = change.column_type {
            parts.push(format!("{prefix} TYPE {}", self.map_type(column_type)));
        }
        if change.nullable {
            parts.push(format!("{prefix} DROP NOT NULL"));
        } else {
            parts.push(format!("{prefix} SET NOT NULL"));
        }
        if let Some(ref default) = change.default {
            parts.push(format!("{prefix} SET DEFAULT {}", self.render_default(default)));
        }
        Ok(parts.join("; "))
    }

    fn compile_drop_unique(&self, table: &str, columns: &[String]) -> Result<String> {
        // Named constraints use `_unique`; inline UNIQUE gets PostgreSQL's `_key`.
        let drops: Vec<String> = [IndexKind::Unique.suffix(), "key"]
            .iter()
            .map(|suffix| {
                format!(
                    "ALTER TABLE {} DROP CONSTRAINT IF EXISTS {}",
                    self.quote_identifier(table),
                    self.quote_identifier(&index_name(table, columns, suffix))
                )
            })
            .collect();
        Ok(drops.join("; "))
    }

    fn compile_drop_primary(&self, table: &str) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} DROP CONSTRAINT IF EXISTS {}",
            self.quote_identifier(table),
            self.quote_identifier(&format!("{table}_pkey"))
        ))
    }

    fn compile_table_exists(&self, table: &str) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = {}",
            self.quote_string(table)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::Blueprint;

    fn grammar() -> PostgresGrammar {
        PostgresGrammar::new()
    }

    #[test]
    fn test_postgres_types() {
        let g = grammar();
        assert_eq!(g.map_type(ColumnType::Float), "DOUBLE PRECISION");
        assert_eq!(g.map_type(ColumnType::DateTime), "TIMESTAMP");
        assert_eq!(g.map_type(ColumnType::string(64)), "VARCHAR(64)");
    }

    #[test]
    fn test_serial_keys() {
        let mut bp = Blueprint::create("users");
        bp.increments("id");
        assert_eq!(
            grammar().compile_create(&bp),
            "CREATE TABLE \"users\" (\"id\" SERIAL PRIMARY KEY)"
        );

        let mut bp = Blueprint::create("users");
        bp.id();
        assert_eq!(
            grammar().compile_create(&bp),
            "CREATE TABLE \"users\" (\"id\" BIGSERIAL PRIMARY KEY)"
        );
    }

    #[test]
    fn test_modify_column_three_clauses() {
        let change = {
            let mut c = ColumnChange::new("status");
            c.string(50).default("active");
            c
        };
        assert_eq!(
            grammar().compile_modify("users", &change).unwrap(),
            "ALTER TABLE \"users\" ALTER COLUMN \"status\" TYPE VARCHAR(50); \
             ALTER TABLE \"users\" ALTER COLUMN \"status\" SET NOT NULL; \
             ALTER TABLE \"users\" ALTER COLUMN \"status\" SET DEFAULT 'active'"
        );
    }

    #[test]
    fn test_modify_without_type_only_sets_nullability() {
        let mut change = ColumnChange::new("bio");
        change.nullable();
        assert_eq!(
            grammar().compile_modify("users", &change).unwrap(),
            "ALTER TABLE \"users\" ALTER COLUMN \"bio\" DROP NOT NULL"
        );
    }

    #[test]
    fn test_drop_unique_covers_both_names() {
        assert_eq!(
            grammar()
                .compile_drop_unique("users", &["email".to_string()])
                .unwrap(),
            "ALTER TABLE \"users\" DROP CONSTRAINT IF EXISTS \"users_email_unique\"; \
             ALTER TABLE \"users\" DROP CONSTRAINT IF EXISTS \"users_email_key\""
        );
    }

    #[test]
    fn test_drop_primary() {
        assert_eq!(
            grammar().compile_drop_primary("users").unwrap(),
            "ALTER TABLE \"users\" DROP CONSTRAINT IF EXISTS \"users_pkey\""
        );
    }
}
