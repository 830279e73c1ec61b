//! Alter commands.
//!
//! Each command describes one mutation of an existing table. Commands are
//! compiled in declaration order by
//! [`Grammar::compile_alter`](crate::Grammar::compile_alter).

use crate::column::{ColumnChange, ColumnDefinition};

/// One mutation of an existing table.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterCommand {
    /// Add a column.
    Add(ColumnDefinition),
    /// Drop one or more columns; each name compiles to its own statement.
    Drop(Vec<String>),
    /// Rename a column.
    Rename {
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },
    /// Redefine a column.
    Modify(ColumnChange),
    /// Drop the conventionally named index over these columns.
    DropIndex(Vec<String>),
    /// Drop the unique constraint over these columns.
    DropUnique(Vec<String>),
    /// Drop the primary key.
    DropPrimary,
}

impl AlterCommand {
    /// Short operation name, used in logs and error messages.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Add(_) => "add column",
            Self::Drop(_) => "drop column",
            Self::Rename { .. } => "rename column",
            Self::Modify(_) => "modify column",
            Self::DropIndex(_) => "drop index",
            Self::DropUnique(_) => "drop unique",
            Self::DropPrimary => "drop primary",
        }
    }
}
