//! JSON table manifests.
//!
//! A manifest describes one or more blueprints as data. Each table is
//! replayed onto a fresh [`Blueprint`] through the same builder methods a
//! closure would call, so compiled SQL is identical either way.
//!
//! ```json
//! {
//!   "table": "users",
//!   "columns": [
//!     { "name": "id", "type": "id" },
//!     { "name": "email", "type": "string", "unique": true },
//!     { "name": "active", "type": "boolean", "default": true }
//!   ],
//!   "indexes": [{ "kind": "index", "columns": ["email", "active"] }]
//! }
//! ```
//!
//! A file may also hold an array of such objects; they are applied in order.

use std::path::{Path, PathBuf};

use oxide_blueprint::{
    Blueprint, ColumnChange, ColumnDefinition, ColumnType, DefaultValue, ForeignKeyAction,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Whether a manifest creates or alters its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestMode {
    /// `CREATE TABLE`.
    #[default]
    Create,
    /// `ALTER TABLE`.
    Alter,
}

/// Column kinds accepted in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Big auto-increment primary key.
    Id,
    /// Integer auto-increment primary key.
    Increments,
    /// Big auto-increment primary key.
    BigIncrements,
    /// VARCHAR; honours `length`.
    String,
    /// TEXT.
    Text,
    /// INTEGER.
    Integer,
    /// BIGINT.
    BigInteger,
    /// BOOLEAN.
    Boolean,
    /// DECIMAL; requires `precision` and `scale`.
    Decimal,
    /// Float.
    Float,
    /// Date-time.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Unsigned big integer.
    ForeignId,
}

/// Referential action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    /// NO ACTION.
    NoAction,
    /// RESTRICT.
    Restrict,
    /// CASCADE.
    Cascade,
    /// SET NULL.
    SetNull,
    /// SET DEFAULT.
    SetDefault,
}

impl From<ReferentialAction> for ForeignKeyAction {
    fn from(action: ReferentialAction) -> Self {
        match action {
            ReferentialAction::NoAction => Self::NoAction,
            ReferentialAction::Restrict => Self::Restrict,
            ReferentialAction::Cascade => Self::Cascade,
            ReferentialAction::SetNull => Self::SetNull,
            ReferentialAction::SetDefault => Self::SetDefault,
        }
    }
}

/// A foreign key reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceManifest {
    /// Referenced table.
    pub table: String,
    /// Referenced column.
    #[serde(default = "default_reference_column")]
    pub column: String,
    /// Action on delete.
    #[serde(default)]
    pub on_delete: Option<ReferentialAction>,
    /// Action on update.
    #[serde(default)]
    pub on_update: Option<ReferentialAction>,
}

fn default_reference_column() -> String {
    "id".to_string()
}

/// One column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnManifest {
    /// Column name.
    pub name: String,
    /// Column kind.
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    /// VARCHAR length (255 when absent).
    #[serde(default)]
    pub length: Option<u32>,
    /// DECIMAL precision.
    #[serde(default)]
    pub precision: Option<u16>,
    /// DECIMAL scale.
    #[serde(default)]
    pub scale: Option<u16>,
    #[serde(default)]
    pub nullable: bool,
    /// Literal default (string, boolean or number).
    #[serde(default)]
    pub default: Option<Value>,
    /// Raw SQL default expression.
    #[serde(default)]
    pub default_expr: Option<String>,
    /// Shorthand for `default_expr: "CURRENT_TIMESTAMP"`.
    #[serde(default)]
    pub use_current: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub index: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub unsigned: bool,
    #[serde(default)]
    pub comment: Option<String>,
    /// Foreign key reference.
    #[serde(default)]
    pub references: Option<ReferenceManifest>,
}

impl ColumnManifest {
    fn column_type(&self) -> std::result::Result<ColumnType, String> {
        column_type(
            &self.name,
            self.kind,
            self.length,
            self.precision,
            self.scale,
        )
    }

    fn apply(&self, column: &mut ColumnDefinition) -> std::result::Result<(), String> {
        match self.kind {
            ColumnKind::Id | ColumnKind::Increments | ColumnKind::BigIncrements => {
                column.auto_increment().primary().unsigned();
            }
            ColumnKind::ForeignId => {
                column.unsigned();
            }
            _ => {}
        }

        if self.nullable {
            column.nullable();
        }
        if let Some(ref value) = self.default {
            column.default(default_value(&self.name, value)?);
        }
        if let Some(ref expr) = self.default_expr {
            column.default_expr(expr.clone());
        }
        if self.use_current {
            column.use_current();
        }
        if self.unique {
            column.unique();
        }
        if self.index {
            column.index();
        }
        if self.primary {
            column.primary();
        }
        if self.auto_increment {
            column.auto_increment();
        }
        if self.unsigned {
            column.unsigned();
        }
        if let Some(ref comment) = self.comment {
            column.comment(comment.clone());
        }
        if let Some(ref fk) = self.references {
            column.references(fk.table.clone(), fk.column.clone());
            if let Some(action) = fk.on_delete {
                column.on_delete(action.into());
            }
            if let Some(action) = fk.on_update {
                column.on_update(action.into());
            }
        }
        Ok(())
    }
}

/// Index definition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKindManifest {
    /// Composite primary key.
    Primary,
    /// Unique constraint.
    Unique,
    /// Secondary index.
    Index,
}

/// One index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexManifest {
    pub kind: IndexKindManifest,
    pub columns: Vec<String>,
    /// Explicit name; derived from table and columns when absent.
    #[serde(default)]
    pub name: Option<String>,
}

/// One alter command, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum CommandManifest {
    /// Add a column.
    Add {
        /// The column.
        column: ColumnManifest,
    },
    /// Drop columns.
    Drop {
        /// Column names.
        columns: Vec<String>,
    },
    /// Rename a column.
    Rename {
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },
    /// Redefine a column.
    Modify {
        /// Column name.
        name: String,
        /// New kind, if the type changes.
        #[serde(default, rename = "type")]
        kind: Option<ColumnKind>,
        #[serde(default)]
        length: Option<u32>,
        #[serde(default)]
        precision: Option<u16>,
        #[serde(default)]
        scale: Option<u16>,
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        default: Option<Value>,
    },
    /// Drop the index over `columns`.
    DropIndex {
        /// Indexed columns.
        columns: Vec<String>,
    },
    /// Drop the unique constraint over `columns`.
    DropUnique {
        /// Constrained columns.
        columns: Vec<String>,
    },
    /// Drop the primary key.
    DropPrimary,
}

/// One table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableManifest {
    /// Table name.
    pub table: String,
    #[serde(default)]
    pub mode: ManifestMode,
    #[serde(default)]
    pub columns: Vec<ColumnManifest>,
    #[serde(default)]
    pub indexes: Vec<IndexManifest>,
    #[serde(default)]
    pub commands: Vec<CommandManifest>,
}

impl TableManifest {
    /// Replays this manifest onto a new blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Manifest`] for a decimal without precision and
    /// scale, an index without columns, or a default that is not a string,
    /// boolean or number.
    pub fn to_blueprint(&self, path: &Path) -> Result<Blueprint> {
        self.replay().map_err(|message| SchemaError::Manifest {
            path: path.to_path_buf(),
            message: format!("table '{}': {message}", self.table),
        })
    }

    fn replay(&self) -> std::result::Result<Blueprint, String> {
        let mut blueprint = match self.mode {
            ManifestMode::Create => Blueprint::create(&self.table),
            ManifestMode::Alter => Blueprint::alter(&self.table),
        };

        for column in &self.columns {
            let handle = blueprint.column(&column.name, column.column_type()?);
            column.apply(handle)?;
        }

        for index in &self.indexes {
            if index.columns.is_empty() {
                return Err(format!("{:?} index has no columns", index.kind));
            }
            let columns: Vec<&str> = index.columns.iter().map(String::as_str).collect();
            match (index.kind, index.name.clone()) {
                (IndexKindManifest::Primary, _) => blueprint.primary(&columns),
                (IndexKindManifest::Unique, None) => blueprint.unique(&columns),
                (IndexKindManifest::Unique, Some(name)) => blueprint.unique_named(name, &columns),
                (IndexKindManifest::Index, None) => blueprint.index(&columns),
                (IndexKindManifest::Index, Some(name)) => blueprint.index_named(name, &columns),
            }
        }

        for command in &self.commands {
            replay_command(&mut blueprint, command)?;
        }

        Ok(blueprint)
    }
}

fn replay_command(
    blueprint: &mut Blueprint,
    command: &CommandManifest,
) -> std::result::Result<(), String> {
    match command {
        CommandManifest::Add { column } => {
            let handle = blueprint.add_column(&column.name, column.column_type()?);
            column.apply(handle)?;
        }
        CommandManifest::Drop { columns } => {
            blueprint.drop_column(&as_strs(columns));
        }
        CommandManifest::Rename { from, to } => blueprint.rename_column(from, to),
        CommandManifest::Modify {
            name,
            kind,
            length,
            precision,
            scale,
            nullable,
            default,
        } => {
            let new_type = kind
                .map(|kind| column_type(name, kind, *length, *precision, *scale))
                .transpose()?;
            let default = default
                .as_ref()
                .map(|value| default_value(name, value))
                .transpose()?;

            let change = blueprint.modify_column(name);
            if let Some(new_type) = new_type {
                set_change_type(change, new_type);
            }
            if *nullable {
                change.nullable();
            }
            if let Some(value) = default {
                change.default(value);
            }
        }
        CommandManifest::DropIndex { columns } => blueprint.drop_index(&as_strs(columns)),
        CommandManifest::DropUnique { columns } => blueprint.drop_unique(&as_strs(columns)),
        CommandManifest::DropPrimary => blueprint.drop_primary(),
    }
    Ok(())
}

fn set_change_type(change: &mut ColumnChange, column_type: ColumnType) {
    match column_type {
        ColumnType::Integer => change.integer(),
        ColumnType::BigInteger => change.big_integer(),
        ColumnType::String { length } => change.string(length),
        ColumnType::Text => change.text(),
        ColumnType::Boolean => change.boolean(),
        ColumnType::Decimal { precision, scale } => change.decimal(precision, scale),
        ColumnType::Float => change.float(),
        ColumnType::DateTime => change.date_time(),
        ColumnType::Timestamp => change.timestamp(),
    };
}

fn as_strs(columns: &[String]) -> Vec<&str> {
    columns.iter().map(String::as_str).collect()
}

fn column_type(
    name: &str,
    kind: ColumnKind,
    length: Option<u32>,
    precision: Option<u16>,
    scale: Option<u16>,
) -> std::result::Result<ColumnType, String> {
    Ok(match kind {
        ColumnKind::Increments | ColumnKind::Integer => ColumnType::Integer,
        ColumnKind::Id
        | ColumnKind::BigIncrements
        | ColumnKind::BigInteger
        | ColumnKind::ForeignId => ColumnType::BigInteger,
        ColumnKind::String => ColumnType::string(length),
        ColumnKind::Text => ColumnType::Text,
        ColumnKind::Boolean => ColumnType::Boolean,
        ColumnKind::Decimal => match (precision, scale) {
            (Some(precision), Some(scale)) => ColumnType::Decimal { precision, scale },
            _ => return Err(format!("decimal column '{name}' requires precision and scale")),
        },
        ColumnKind::Float => ColumnType::Float,
        ColumnKind::DateTime => ColumnType::DateTime,
        ColumnKind::Timestamp => ColumnType::Timestamp,
    })
}

fn default_value(name: &str, value: &Value) -> std::result::Result<DefaultValue, String> {
    match value {
        Value::String(s) => Ok(DefaultValue::from(s.as_str())),
        Value::Bool(b) => Ok(DefaultValue::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(DefaultValue::from)
            .or_else(|| n.as_f64().map(DefaultValue::from))
            .ok_or_else(|| format!("default of column '{name}' is out of range")),
        other => Err(format!(
            "default of column '{name}' must be a string, boolean or number, got {other}"
        )),
    }
}

/// A parsed manifest file.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    tables: Vec<TableManifest>,
}

impl Manifest {
    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] if the file cannot be read, and the
    /// errors of [`Manifest::parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(path, &text)
    }

    /// Parses manifest text; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Json`] for malformed JSON and
    /// [`SchemaError::Manifest`] for JSON that does not describe tables.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let document: Value = serde_json::from_str(text)?;

        let tables = if document.is_array() {
            serde_json::from_value::<Vec<TableManifest>>(document)
        } else {
            serde_json::from_value::<TableManifest>(document).map(|table| vec![table])
        }
        .map_err(|e| SchemaError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { path, tables })
    }

    /// Returns the manifest path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the table manifests in file order.
    #[must_use]
    pub fn tables(&self) -> &[TableManifest] {
        &self.tables
    }

    /// Builds one blueprint per table, in file order.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError::Manifest`] raised by a table.
    pub fn blueprints(&self) -> Result<Vec<Blueprint>> {
        self.tables
            .iter()
            .map(|table| table.to_blueprint(&self.path))
            .collect()
    }
}
