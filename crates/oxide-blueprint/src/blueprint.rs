//! Blueprints: single-use, in-memory descriptions of one table.
//!
//! A blueprint is either in create mode (it accumulates columns and index
//! definitions for a `CREATE TABLE`) or in alter mode (it accumulates
//! [`AlterCommand`]s for an existing table). Blueprints never produce SQL
//! themselves; a [`Grammar`](crate::Grammar) compiles them.
//!
//! # Example
//!
//! ```rust
//! use oxide_blueprint::{Blueprint, BlueprintMode};
//!
//! let mut bp = Blueprint::create("users");
//! bp.id();
//! bp.string("email", None).unique();
//! bp.boolean("active").default(true);
//! bp.timestamps();
//!
//! assert_eq!(bp.mode(), BlueprintMode::Create);
//! assert_eq!(bp.columns().len(), 5);
//! ```

use crate::column::{ColumnChange, ColumnDefinition, ColumnType};
use crate::command::AlterCommand;
use crate::index::{IndexDefinition, IndexKind};

/// Which compilation algorithm a blueprint is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlueprintMode {
    /// `CREATE TABLE`.
    Create,
    /// `ALTER TABLE` on an existing table.
    Alter,
}

/// Declarative description of one table's shape or alterations.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    table: String,
    mode: BlueprintMode,
    columns: Vec<ColumnDefinition>,
    indexes: Vec<IndexDefinition>,
    commands: Vec<AlterCommand>,
}

impl Blueprint {
    /// Creates an empty blueprint in the given mode.
    #[must_use]
    pub fn new(table: impl Into<String>, mode: BlueprintMode) -> Self {
        Self {
            table: table.into(),
            mode,
            columns: Vec::new(),
            indexes: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Creates an empty create-mode blueprint.
    #[must_use]
    pub fn create(table: impl Into<String>) -> Self {
        Self::new(table, BlueprintMode::Create)
    }

    /// Creates an empty alter-mode blueprint.
    #[must_use]
    pub fn alter(table: impl Into<String>) -> Self {
        Self::new(table, BlueprintMode::Alter)
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the blueprint mode.
    #[must_use]
    pub const fn mode(&self) -> BlueprintMode {
        self.mode
    }

    /// Returns the declared columns, in order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Returns the declared index definitions, in order.
    #[must_use]
    pub fn indexes(&self) -> &[IndexDefinition] {
        &self.indexes
    }

    /// Returns the declared alter commands, in order.
    #[must_use]
    pub fn commands(&self) -> &[AlterCommand] {
        &self.commands
    }

    // =========================================================================
    // Columns (create mode)
    // =========================================================================

    /// Appends a column and returns a handle to it.
    pub fn column(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> &mut ColumnDefinition {
        self.columns.push(ColumnDefinition::new(name, column_type));
        match self.columns.last_mut() {
            Some(column) => column,
            None => unreachable!("a column was just pushed"),
        }
    }

    /// Big auto-increment primary key named `id`.
    pub fn id(&mut self) -> &mut ColumnDefinition {
        self.big_increments("id")
    }

    /// Big auto-increment primary key.
    pub fn big_increments(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::BigInteger)
            .auto_increment()
            .primary()
            .unsigned()
    }

    /// Integer auto-increment primary key.
    pub fn increments(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::Integer)
            .auto_increment()
            .primary()
            .unsigned()
    }

    /// VARCHAR column; `None` selects a length of 255.
    pub fn string(
        &mut self,
        name: impl Into<String>,
        length: impl Into<Option<u32>>,
    ) -> &mut ColumnDefinition {
        self.column(name, ColumnType::string(length))
    }

    /// TEXT column.
    pub fn text(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::Text)
    }

    /// INTEGER column.
    pub fn integer(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::Integer)
    }

    /// BIGINT column.
    pub fn big_integer(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::BigInteger)
    }

    /// BOOLEAN column.
    pub fn boolean(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::Boolean)
    }

    /// DECIMAL column.
    pub fn decimal(
        &mut self,
        name: impl Into<String>,
        precision: u16,
        scale: u16,
    ) -> &mut ColumnDefinition {
        self.column(name, ColumnType::Decimal { precision, scale })
    }

    /// Floating point column.
    pub fn float(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::Float)
    }

    /// Date-time column.
    pub fn date_time(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::DateTime)
    }

    /// Timestamp column.
    pub fn timestamp(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::Timestamp)
    }

    /// Unsigned big integer column meant to hold another table's key.
    pub fn foreign_id(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.column(name, ColumnType::BigInteger).unsigned()
    }

    /// Nullable `created_at` and `updated_at` timestamps.
    pub fn timestamps(&mut self) {
        self.timestamp("created_at").nullable();
        self.timestamp("updated_at").nullable();
    }

    /// Nullable `deleted_at` timestamp.
    pub fn soft_deletes(&mut self) {
        self.timestamp("deleted_at").nullable();
    }

    // =========================================================================
    // Index definitions (create mode)
    // =========================================================================

    fn push_index(&mut self, kind: IndexKind, name: Option<String>, columns: &[&str]) {
        self.indexes.push(IndexDefinition {
            name,
            columns: columns.iter().map(|&c| c.to_string()).collect(),
            kind,
        });
    }

    /// Secondary index over `columns`.
    pub fn index(&mut self, columns: &[&str]) {
        self.push_index(IndexKind::Index, None, columns);
    }

    /// Secondary index with an explicit name.
    pub fn index_named(&mut self, name: impl Into<String>, columns: &[&str]) {
        self.push_index(IndexKind::Index, Some(name.into()), columns);
    }

    /// Unique constraint over `columns`.
    pub fn unique(&mut self, columns: &[&str]) {
        self.push_index(IndexKind::Unique, None, columns);
    }

    /// Unique constraint with an explicit name.
    pub fn unique_named(&mut self, name: impl Into<String>, columns: &[&str]) {
        self.push_index(IndexKind::Unique, Some(name.into()), columns);
    }

    /// Primary key over `columns`.
    pub fn primary(&mut self, columns: &[&str]) {
        self.push_index(IndexKind::Primary, None, columns);
    }

    // =========================================================================
    // Alter commands (alter mode)
    // =========================================================================

    fn push_command(&mut self, command: AlterCommand) {
        self.commands.push(command);
    }

    /// Appends an `Add` command and returns a handle to its column.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> &mut ColumnDefinition {
        self.push_command(AlterCommand::Add(ColumnDefinition::new(name, column_type)));
        match self.commands.last_mut() {
            Some(AlterCommand::Add(column)) => column,
            _ => unreachable!("an Add command was just pushed"),
        }
    }

    /// Adds a VARCHAR column; `None` selects a length of 255.
    pub fn add_string(
        &mut self,
        name: impl Into<String>,
        length: impl Into<Option<u32>>,
    ) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::string(length))
    }

    /// Adds a TEXT column.
    pub fn add_text(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Text)
    }

    /// Adds an INTEGER column.
    pub fn add_integer(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Integer)
    }

    /// Adds a BIGINT column.
    pub fn add_big_integer(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::BigInteger)
    }

    /// Adds a BOOLEAN column.
    pub fn add_boolean(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Boolean)
    }

    /// Adds a DECIMAL column.
    pub fn add_decimal(
        &mut self,
        name: impl Into<String>,
        precision: u16,
        scale: u16,
    ) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Decimal { precision, scale })
    }

    /// Adds a floating point column.
    pub fn add_float(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Float)
    }

    /// Adds a date-time column.
    pub fn add_date_time(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::DateTime)
    }

    /// Adds a timestamp column.
    pub fn add_timestamp(&mut self, name: impl Into<String>) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Timestamp)
    }

    /// Drops every listed column. One command, one statement per column.
    pub fn drop_column(&mut self, columns: &[&str]) {
        self.push_command(AlterCommand::Drop(to_owned(columns)));
    }

    /// Renames a column.
    pub fn rename_column(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.push_command(AlterCommand::Rename {
            from: from.into(),
            to: to.into(),
        });
    }

    /// Redefines an existing column; chain type setters on the returned handle.
    pub fn modify_column(&mut self, name: impl Into<String>) -> &mut ColumnChange {
        self.push_command(AlterCommand::Modify(ColumnChange::new(name)));
        match self.commands.last_mut() {
            Some(AlterCommand::Modify(change)) => change,
            _ => unreachable!("a Modify command was just pushed"),
        }
    }

    /// Drops the conventionally named index over `columns`.
    pub fn drop_index(&mut self, columns: &[&str]) {
        self.push_command(AlterCommand::DropIndex(to_owned(columns)));
    }

    /// Drops the unique constraint over `columns`.
    pub fn drop_unique(&mut self, columns: &[&str]) {
        self.push_command(AlterCommand::DropUnique(to_owned(columns)));
    }

    /// Drops the primary key.
    pub fn drop_primary(&mut self) {
        self.push_command(AlterCommand::DropPrimary);
    }
}

fn to_owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|&c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::DefaultValue;

    #[test]
    fn test_id_column() {
        let mut bp = Blueprint::create("users");
        bp.id();

        let col = &bp.columns()[0];
        assert_eq!(col.name, "id");
        assert_eq!(col.column_type, ColumnType::BigInteger);
        assert!(col.auto_increment);
        assert!(col.primary);
        assert!(!col.nullable);
    }

    #[test]
    fn test_chaining_mutates_appended_column() {
        let mut bp = Blueprint::create("users");
        bp.string("name", None).nullable().default("anon");
        bp.integer("age");

        assert_eq!(bp.columns().len(), 2);
        let name = &bp.columns()[0];
        assert_eq!(name.column_type, ColumnType::String { length: 255 });
        assert!(name.nullable);
        assert_eq!(name.default, Some(DefaultValue::String("anon".into())));
        assert!(!bp.columns()[1].nullable);
    }

    #[test]
    fn test_timestamps_and_soft_deletes() {
        let mut bp = Blueprint::create("posts");
        bp.timestamps();
        bp.soft_deletes();

        let names: Vec<&str> = bp.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["created_at", "updated_at", "deleted_at"]);
        assert!(bp.columns().iter().all(|c| c.nullable));
        assert!(bp
            .columns()
            .iter()
            .all(|c| c.column_type == ColumnType::Timestamp));
    }

    #[test]
    fn test_index_definitions_keep_column_order() {
        let mut bp = Blueprint::create("order_items");
        bp.primary(&["order_id", "product_id"]);
        bp.unique_named("uniq_sku", &["sku"]);
        bp.index(&["b", "a"]);

        let idx = bp.indexes();
        assert_eq!(idx[0].kind, IndexKind::Primary);
        assert_eq!(idx[0].columns, ["order_id", "product_id"]);
        assert_eq!(idx[1].name.as_deref(), Some("uniq_sku"));
        assert_eq!(idx[2].columns, ["b", "a"]);
    }

    #[test]
    fn test_alter_commands_in_declaration_order() {
        let mut bp = Blueprint::alter("users");
        bp.add_string("phone", 20).nullable();
        bp.drop_column(&["a", "b"]);
        bp.rename_column("name", "full_name");
        bp.modify_column("status").string(50).default("active");
        bp.drop_index(&["email"]);
        bp.drop_unique(&["email"]);
        bp.drop_primary();

        assert_eq!(bp.mode(), BlueprintMode::Alter);
        assert!(bp.columns().is_empty());
        let cmds = bp.commands();
        assert_eq!(cmds.len(), 7);

        match &cmds[0] {
            AlterCommand::Add(col) => {
                assert_eq!(col.column_type, ColumnType::String { length: 20 });
                assert!(col.nullable);
            }
            other => panic!("Expected Add, got {other:?}"),
        }
        assert_eq!(cmds[1], AlterCommand::Drop(vec!["a".into(), "b".into()]));
        match &cmds[3] {
            AlterCommand::Modify(change) => {
                assert_eq!(change.column_type, Some(ColumnType::String { length: 50 }));
                assert_eq!(change.default, Some(DefaultValue::String("active".into())));
            }
            other => panic!("Expected Modify, got {other:?}"),
        }
        assert_eq!(cmds[6], AlterCommand::DropPrimary);
    }

    #[test]
    fn test_foreign_id_is_unsigned_big_integer() {
        let mut bp = Blueprint::create("posts");
        bp.foreign_id("user_id").references("users", "id");

        let col = &bp.columns()[0];
        assert_eq!(col.column_type, ColumnType::BigInteger);
        assert!(col.unsigned);
        assert!(!col.auto_increment);
        assert!(col.references.is_some());
    }
}
