//! Dialect-specific compilation of blueprints into SQL.
//!
//! Dialects differ in type names, auto-increment syntax, boolean literals and
//! in which alterations they can express at all. The [`Grammar`] trait holds
//! the shared algorithms as default methods; each dialect supplies the parts
//! that differ.

mod postgres;
mod sqlite;

pub use postgres::PostgresGrammar;
pub use sqlite::SqliteGrammar;

use crate::blueprint::Blueprint;
use crate::column::{ColumnChange, ColumnDefinition, ColumnType, DefaultValue, ForeignKeyRef};
use crate::command::AlterCommand;
use crate::dialect::Dialect;
use crate::error::{GrammarError, Result};
use crate::index::{IndexKind, index_name};

/// Compiles blueprints into SQL statements for one dialect.
///
/// Implementations are stateless; compiling the same blueprint twice yields
/// identical output.
pub trait Grammar: Send + Sync {
    /// Returns the dialect this grammar targets.
    fn dialect(&self) -> Dialect;

    /// Maps a logical column type to the dialect's type name.
    fn map_type(&self, column_type: ColumnType) -> String;

    /// Returns the `(true, false)` literal tokens.
    fn boolean_literals(&self) -> (&'static str, &'static str);

    /// Compiles one column clause: `<name> <type>[ <modifiers>]`.
    ///
    /// `inline_primary` is false when the primary key is emitted as a
    /// table-level clause instead.
    fn column_clause(&self, column: &ColumnDefinition, inline_primary: bool) -> String;

    /// Compiles a column redefinition.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Unsupported`] if the dialect cannot alter
    /// columns in place.
    fn compile_modify(&self, table: &str, change: &ColumnChange) -> Result<String>;

    /// Compiles dropping the unique constraint over `columns`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Unsupported`] if the dialect cannot drop
    /// constraints.
    fn compile_drop_unique(&self, table: &str, columns: &[String]) -> Result<String>;

    /// Compiles dropping the primary key.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Unsupported`] if the dialect cannot drop
    /// constraints.
    fn compile_drop_primary(&self, table: &str) -> Result<String>;

    /// Compiles a query returning the number of tables named `table`.
    fn compile_table_exists(&self, table: &str) -> String;

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        let escaped = name.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Quotes a string literal.
    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Renders a column default.
    fn render_default(&self, default: &DefaultValue) -> String {
        let (true_token, false_token) = self.boolean_literals();
        default.to_sql(true_token, false_token)
    }

    /// Quotes and joins a column list.
    fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders an inline `REFERENCES` clause.
    fn references_clause(&self, fk: &ForeignKeyRef) -> String {
        let mut sql = format!(
            " REFERENCES {} ({})",
            self.quote_identifier(&fk.table),
            self.quote_identifier(&fk.column)
        );
        if let Some(action) = fk.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = fk.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        sql
    }

    /// Compiles the `CREATE TABLE` statement of a blueprint.
    ///
    /// Alter commands are ignored.
    fn compile_create(&self, blueprint: &Blueprint) -> String {
        let table = blueprint.table();
        let (key, from_definition) = primary_key_columns(blueprint);
        let table_level_key = key.len() > 1 || from_definition;

        let mut clauses: Vec<String> = blueprint
            .columns()
            .iter()
            .map(|c| {
                let inline = c.primary && (c.is_serial() || !table_level_key);
                self.column_clause(c, inline)
            })
            .collect();

        if table_level_key && !key.is_empty() {
            clauses.push(format!("PRIMARY KEY ({})", self.column_list(&key)));
        }

        for index in blueprint.indexes() {
            if index.kind == IndexKind::Unique {
                clauses.push(format!(
                    "CONSTRAINT {} UNIQUE ({})",
                    self.quote_identifier(&index.name_for(table)),
                    self.column_list(&index.columns)
                ));
            }
        }

        format!(
            "CREATE TABLE {} ({})",
            self.quote_identifier(table),
            clauses.join(", ")
        )
    }

    /// Compiles the `CREATE INDEX` statements that accompany a `CREATE TABLE`:
    /// one per index definition, then one per column flagged with `.index()`.
    fn compile_create_indexes(&self, blueprint: &Blueprint) -> Vec<String> {
        let table = blueprint.table();
        let defined = blueprint
            .indexes()
            .iter()
            .filter(|i| i.kind == IndexKind::Index)
            .map(|i| (i.name_for(table), i.columns.clone()));
        let flagged = blueprint
            .columns()
            .iter()
            .filter(|c| c.index)
            .map(|c| {
                let columns = vec![c.name.clone()];
                (index_name(table, &columns, IndexKind::Index.suffix()), columns)
            });

        defined
            .chain(flagged)
            .map(|(name, columns)| self.compile_create_index(table, &name, &columns))
            .collect()
    }

    /// Generates SQL for CREATE INDEX.
    fn compile_create_index(&self, table: &str, name: &str, columns: &[String]) -> String {
        format!(
            "CREATE INDEX {} ON {} ({})",
            self.quote_identifier(name),
            self.quote_identifier(table),
            self.column_list(columns)
        )
    }

    /// Compiles the alter commands of a blueprint, in declaration order.
    ///
    /// Every command yields one element, except `Drop`, which yields one per
    /// column, and `Add` of an indexed column, which is followed by its
    /// `CREATE INDEX`. Columns and index definitions are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first [`GrammarError`] raised by a command; nothing is
    /// returned for the commands that compiled before it.
    fn compile_alter(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        let table = blueprint.table();
        let mut statements = Vec::with_capacity(blueprint.commands().len());
        for command in blueprint.commands() {
            match command {
                AlterCommand::Add(column) => {
                    statements.push(self.compile_add(table, column));
                    if column.index {
                        let columns = vec![column.name.clone()];
                        let name = index_name(table, &columns, IndexKind::Index.suffix());
                        statements.push(self.compile_create_index(table, &name, &columns));
                    }
                }
                AlterCommand::Drop(columns) => {
                    statements.extend(self.compile_drop_columns(table, columns));
                }
                AlterCommand::Rename { from, to } => {
                    statements.push(self.compile_rename_column(table, from, to));
                }
                AlterCommand::Modify(change) => {
                    statements.push(self.compile_modify(table, change)?);
                }
                AlterCommand::DropIndex(columns) => {
                    statements.push(self.compile_drop_index(table, columns));
                }
                AlterCommand::DropUnique(columns) => {
                    statements.push(self.compile_drop_unique(table, columns)?);
                }
                AlterCommand::DropPrimary => statements.push(self.compile_drop_primary(table)?),
            }
        }
        Ok(statements)
    }

    /// Generates SQL for ADD COLUMN.
    fn compile_add(&self, table: &str, column: &ColumnDefinition) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_identifier(table),
            self.column_clause(column, column.primary)
        )
    }

    /// Generates one DROP COLUMN statement per column.
    fn compile_drop_columns(&self, table: &str, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .map(|column| {
                format!(
                    "ALTER TABLE {} DROP COLUMN {}",
                    self.quote_identifier(table),
                    self.quote_identifier(column)
                )
            })
            .collect()
    }

    /// Generates SQL for RENAME COLUMN.
    fn compile_rename_column(&self, table: &str, from: &str, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.quote_identifier(table),
            self.quote_identifier(from),
            self.quote_identifier(to)
        )
    }

    /// Drops the index named `<table>_<cols>_index`.
    fn compile_drop_index(&self, table: &str, columns: &[String]) -> String {
        format!(
            "DROP INDEX IF EXISTS {}",
            self.quote_identifier(&index_name(table, columns, IndexKind::Index.suffix()))
        )
    }

    /// Generates SQL for DROP TABLE.
    fn compile_drop_table(&self, table: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(table))
    }

    /// Generates SQL for DROP TABLE IF EXISTS.
    fn compile_drop_table_if_exists(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", self.quote_identifier(table))
    }

    /// Generates SQL for renaming a table.
    fn compile_rename_table(&self, from: &str, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote_identifier(from),
            self.quote_identifier(to)
        )
    }

    /// Builds the error for an alteration this dialect cannot express.
    fn unsupported(&self, operation: &'static str, table: &str) -> GrammarError {
        GrammarError::Unsupported {
            dialect: self.dialect(),
            operation,
            table: table.to_string(),
        }
    }
}

/// Columns of the primary key that are not auto-increment integers: flagged
/// columns in declared order, then columns of `primary(...)` definitions not
/// already listed. The flag is set when a definition contributed a column.
pub(crate) fn primary_key_columns(blueprint: &Blueprint) -> (Vec<String>, bool) {
    let serial: Vec<&str> = blueprint
        .columns()
        .iter()
        .filter(|c| c.is_serial())
        .map(|c| c.name.as_str())
        .collect();

    let mut key: Vec<String> = blueprint
        .columns()
        .iter()
        .filter(|c| c.primary && !c.is_serial())
        .map(|c| c.name.clone())
        .collect();
    let mut from_definition = false;
    for index in blueprint.indexes() {
        if index.kind != IndexKind::Primary {
            continue;
        }
        for column in &index.columns {
            if serial.contains(&column.as_str()) {
                continue;
            }
            from_definition = true;
            if !key.contains(column) {
                key.push(column.clone());
            }
        }
    }
    (key, from_definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_columns_merges_definitions() {
        let mut bp = Blueprint::create("t");
        bp.id();
        bp.integer("a").primary();
        bp.integer("b");
        bp.primary(&["a", "b"]);

        let (key, from_definition) = primary_key_columns(&bp);
        assert_eq!(key, ["a", "b"]);
        assert!(from_definition);
    }

    #[test]
    fn test_primary_key_columns_skips_serial_columns() {
        let mut bp = Blueprint::create("t");
        bp.id();
        bp.primary(&["id"]);

        let (key, from_definition) = primary_key_columns(&bp);
        assert!(key.is_empty());
        assert!(!from_definition);
    }

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        let grammar = SqliteGrammar::new();
        assert_eq!(grammar.quote_identifier("users"), "\"users\"");
        assert_eq!(grammar.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_compile_is_pure() {
        let mut bp = Blueprint::create("users");
        bp.id();
        bp.string("email", None).unique();

        for grammar in [Dialect::Sqlite.grammar(), Dialect::Postgres.grammar()] {
            assert_eq!(grammar.compile_create(&bp), grammar.compile_create(&bp));
        }
    }
}
