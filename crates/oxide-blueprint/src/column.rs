//! Column definitions.
//!
//! A [`ColumnDefinition`] is appended to a [`Blueprint`](crate::Blueprint) by
//! one of its typed constructors and then refined through chained modifiers:
//!
//! ```rust
//! use oxide_blueprint::{Blueprint, ColumnType, DefaultValue};
//!
//! let mut bp = Blueprint::create("users");
//! bp.string("status", 20).nullable().default("active");
//!
//! let col = &bp.columns()[0];
//! assert_eq!(col.column_type, ColumnType::String { length: 20 });
//! assert!(col.nullable);
//! assert_eq!(col.default, Some(DefaultValue::String("active".into())));
//! ```

/// Length used by `string` columns when none is given.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Dialect-neutral column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInteger,
    /// Variable-length string.
    String {
        /// Maximum length in characters.
        length: u32,
    },
    /// Unbounded text.
    Text,
    /// Boolean.
    Boolean,
    /// Exact numeric.
    Decimal {
        /// Total number of digits.
        precision: u16,
        /// Digits after the decimal point.
        scale: u16,
    },
    /// Floating point.
    Float,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
}

impl ColumnType {
    /// Creates a string type, falling back to [`DEFAULT_STRING_LENGTH`].
    #[must_use]
    pub fn string(length: impl Into<Option<u32>>) -> Self {
        Self::String {
            length: length.into().unwrap_or(DEFAULT_STRING_LENGTH),
        }
    }

    /// Returns whether the type can back an auto-increment column.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::BigInteger)
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// String literal, rendered single-quoted.
    String(String),
    /// Boolean, rendered with the dialect's truthy/falsy token.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`), rendered verbatim.
    Expression(String),
}

impl DefaultValue {
    /// Renders the value as a SQL literal using `true_token` / `false_token`
    /// for booleans.
    ///
    /// Embedded single quotes in string values are doubled.
    #[must_use]
    pub fn to_sql(&self, true_token: &str, false_token: &str) -> String {
        match self {
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Bool(true) => true_token.to_string(),
            Self::Bool(false) => false_token.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A reference to a column in another table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    /// The referenced table name.
    pub table: String,
    /// The referenced column name.
    pub column: String,
    /// Action on delete.
    pub on_delete: Option<ForeignKeyAction>,
    /// Action on update.
    pub on_update: Option<ForeignKeyAction>,
}

/// A single column of a table.
///
/// Columns are NOT NULL unless marked [`nullable`](Self::nullable).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Logical type.
    pub column_type: ColumnType,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether the column auto-increments.
    pub auto_increment: bool,
    /// Whether the column is (part of) the primary key.
    pub primary: bool,
    /// Whether the column carries an inline UNIQUE constraint.
    pub unique: bool,
    /// Whether a secondary index should be created for the column.
    pub index: bool,
    /// Unsigned flag. Neither SQLite nor PostgreSQL renders it.
    pub unsigned: bool,
    /// Free-text comment. Not rendered.
    pub comment: Option<String>,
    /// Foreign key reference, if any.
    pub references: Option<ForeignKeyRef>,
}

impl ColumnDefinition {
    /// Creates a NOT NULL column without modifiers.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            auto_increment: false,
            primary: false,
            unique: false,
            index: false,
            unsigned: false,
            comment: None,
            references: None,
        }
    }

    /// Marks the column as nullable.
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Sets the default value.
    pub fn default(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    /// Sets a raw SQL expression as default.
    pub fn default_expr(&mut self, expr: impl Into<String>) -> &mut Self {
        self.default = Some(DefaultValue::Expression(expr.into()));
        self
    }

    /// Defaults the column to `CURRENT_TIMESTAMP`.
    pub fn use_current(&mut self) -> &mut Self {
        self.default_expr("CURRENT_TIMESTAMP")
    }

    /// Adds an inline UNIQUE constraint.
    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Requests a secondary index on this column.
    pub fn index(&mut self) -> &mut Self {
        self.index = true;
        self
    }

    /// Marks the column as part of the primary key.
    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    /// Marks the column as auto-incrementing.
    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column as unsigned.
    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    /// Attaches a comment.
    pub fn comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    /// Adds a foreign key reference to `table`.`column`.
    pub fn references(&mut self, table: impl Into<String>, column: impl Into<String>) -> &mut Self {
        self.references = Some(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
            on_delete: None,
            on_update: None,
        });
        self
    }

    /// Sets the ON DELETE action of the foreign key reference.
    ///
    /// Has no effect without a prior [`references`](Self::references) call.
    pub fn on_delete(&mut self, action: ForeignKeyAction) -> &mut Self {
        if let Some(fk) = self.references.as_mut() {
            fk.on_delete = Some(action);
        }
        self
    }

    /// Sets the ON UPDATE action of the foreign key reference.
    pub fn on_update(&mut self, action: ForeignKeyAction) -> &mut Self {
        if let Some(fk) = self.references.as_mut() {
            fk.on_update = Some(action);
        }
        self
    }

    /// Returns whether the column is an auto-increment integer key.
    #[must_use]
    pub const fn is_serial(&self) -> bool {
        self.auto_increment && self.column_type.is_integer()
    }
}

/// Full redefinition of an existing column, carried by
/// [`AlterCommand::Modify`](crate::AlterCommand::Modify).
///
/// The type is optional: a change that only touches nullability or the
/// default leaves it unset. Nullability is always asserted.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChange {
    /// Column name.
    pub name: String,
    /// New type, if one was set.
    pub column_type: Option<ColumnType>,
    /// Target nullability.
    pub nullable: bool,
    /// New default, if one was set.
    pub default: Option<DefaultValue>,
}

impl ColumnChange {
    /// Creates a change that only asserts NOT NULL.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: None,
            nullable: false,
            default: None,
        }
    }

    fn set_type(&mut self, column_type: ColumnType) -> &mut Self {
        self.column_type = Some(column_type);
        self
    }

    /// Changes the type to VARCHAR.
    pub fn string(&mut self, length: impl Into<Option<u32>>) -> &mut Self {
        self.set_type(ColumnType::string(length))
    }

    /// Changes the type to TEXT.
    pub fn text(&mut self) -> &mut Self {
        self.set_type(ColumnType::Text)
    }

    /// Changes the type to INTEGER.
    pub fn integer(&mut self) -> &mut Self {
        self.set_type(ColumnType::Integer)
    }

    /// Changes the type to BIGINT.
    pub fn big_integer(&mut self) -> &mut Self {
        self.set_type(ColumnType::BigInteger)
    }

    /// Changes the type to BOOLEAN.
    pub fn boolean(&mut self) -> &mut Self {
        self.set_type(ColumnType::Boolean)
    }

    /// Changes the type to DECIMAL.
    pub fn decimal(&mut self, precision: u16, scale: u16) -> &mut Self {
        self.set_type(ColumnType::Decimal { precision, scale })
    }

    /// Changes the type to a float.
    pub fn float(&mut self) -> &mut Self {
        self.set_type(ColumnType::Float)
    }

    /// Changes the type to a date-time.
    pub fn date_time(&mut self) -> &mut Self {
        self.set_type(ColumnType::DateTime)
    }

    /// Changes the type to a timestamp.
    pub fn timestamp(&mut self) -> &mut Self {
        self.set_type(ColumnType::Timestamp)
    }

    /// Allows NULL.
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Sets the new default.
    pub fn default(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.default = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_column_is_not_null() {
        let col = ColumnDefinition::new("id", ColumnType::Integer);
        assert_eq!(col.name, "id");
        assert!(!col.nullable);
        assert!(!col.primary);
        assert!(col.default.is_none());
    }

    #[test]
    fn test_string_type_default_length() {
        assert_eq!(ColumnType::string(None), ColumnType::String { length: 255 });
        assert_eq!(ColumnType::string(20), ColumnType::String { length: 20 });
    }

    #[test]
    fn test_chained_modifiers() {
        let mut col = ColumnDefinition::new("email", ColumnType::string(None));
        col.nullable().unique().comment("login").default("x");
        assert!(col.nullable);
        assert!(col.unique);
        assert_eq!(col.comment.as_deref(), Some("login"));
        assert_eq!(col.default, Some(DefaultValue::String("x".into())));
    }

    #[test]
    fn test_on_delete_without_reference_is_ignored() {
        let mut col = ColumnDefinition::new("user_id", ColumnType::BigInteger);
        col.on_delete(ForeignKeyAction::Cascade);
        assert!(col.references.is_none());

        col.references("users", "id").on_delete(ForeignKeyAction::Cascade);
        let fk = col.references.as_ref().unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.on_delete, Some(ForeignKeyAction::Cascade));
    }

    #[test]
    fn test_is_serial() {
        let mut col = ColumnDefinition::new("id", ColumnType::BigInteger);
        assert!(!col.is_serial());
        col.auto_increment();
        assert!(col.is_serial());

        let mut col = ColumnDefinition::new("code", ColumnType::Text);
        col.auto_increment();
        assert!(!col.is_serial());
    }

    #[test]
    fn test_default_value_to_sql() {
        assert_eq!(DefaultValue::from("hello").to_sql("1", "0"), "'hello'");
        assert_eq!(DefaultValue::from("it's").to_sql("1", "0"), "'it''s'");
        assert_eq!(DefaultValue::from(true).to_sql("1", "0"), "1");
        assert_eq!(DefaultValue::from(false).to_sql("true", "false"), "false");
        assert_eq!(DefaultValue::from(42).to_sql("1", "0"), "42");
        assert_eq!(DefaultValue::from(1.5).to_sql("1", "0"), "1.5");
        assert_eq!(
            DefaultValue::Expression("CURRENT_TIMESTAMP".into()).to_sql("1", "0"),
            "CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_column_change_type_setters() {
        let mut change = ColumnChange::new("status");
        assert!(change.column_type.is_none());
        change.string(50).default("active");
        assert_eq!(change.column_type, Some(ColumnType::String { length: 50 }));
        assert!(!change.nullable);

        change.decimal(8, 2).nullable();
        assert_eq!(
            change.column_type,
            Some(ColumnType::Decimal {
                precision: 8,
                scale: 2
            })
        );
        assert!(change.nullable);
    }
}
