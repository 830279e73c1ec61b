//! # oxide-blueprint
//!
//! Dialect-neutral table blueprints compiled into literal SQL DDL.
//!
//! A [`Blueprint`] accumulates columns, index definitions and alter commands
//! for exactly one table. A [`Grammar`] turns it into statements for one
//! dialect. Compilation is pure: nothing here touches a connection.
//!
//! ```rust
//! use oxide_blueprint::{Blueprint, Dialect};
//!
//! let mut bp = Blueprint::create("users");
//! bp.id();
//! bp.string("email", None).unique();
//!
//! let sqlite = Dialect::Sqlite.grammar().compile_create(&bp);
//! assert_eq!(
//!     sqlite,
//!     r#"CREATE TABLE "users" ("id" INTEGER PRIMARY KEY AUTOINCREMENT, "email" VARCHAR(255) NOT NULL UNIQUE)"#
//! );
//!
//! let pg = Dialect::Postgres.grammar().compile_create(&bp);
//! assert_eq!(
//!     pg,
//!     r#"CREATE TABLE "users" ("id" BIGSERIAL PRIMARY KEY, "email" VARCHAR(255) NOT NULL UNIQUE)"#
//! );
//! ```
//!
//! Alterations a dialect cannot express fail to compile:
//!
//! ```rust
//! use oxide_blueprint::{Blueprint, Dialect, GrammarError};
//!
//! let mut bp = Blueprint::alter("users");
//! bp.modify_column("status").string(50).default("active");
//!
//! let err = Dialect::Sqlite.grammar().compile_alter(&bp).unwrap_err();
//! assert!(matches!(err, GrammarError::Unsupported { .. }));
//! ```

pub mod blueprint;
pub mod column;
pub mod command;
pub mod dialect;
pub mod error;
pub mod grammar;
pub mod index;

pub use blueprint::{Blueprint, BlueprintMode};
pub use column::{
    ColumnChange, ColumnDefinition, ColumnType, DEFAULT_STRING_LENGTH, DefaultValue,
    ForeignKeyAction, ForeignKeyRef,
};
pub use command::AlterCommand;
pub use dialect::{Dialect, grammar_for};
pub use error::{GrammarError, Result, UnknownDialectError};
pub use grammar::{Grammar, PostgresGrammar, SqliteGrammar};
pub use index::{IndexDefinition, IndexKind, index_name};
