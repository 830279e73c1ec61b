//! Applies table blueprints to a live database.
//!
//! `oxide-schema` sits on top of [`oxide_blueprint`]: a [`SchemaBuilder`]
//! owns a [`Connection`] and a dialect grammar, builds a blueprint from a
//! closure, compiles it, and executes the statements strictly in order.
//!
//! - **Builder** - `create`, `table`, `drop`, `drop_if_exists`, `rename`,
//!   `has_table`, plus dry-run and compile-only variants
//! - **Connection** - the execution seam, implemented for sqlx pools
//! - **Manifest** - JSON descriptions of blueprints, used by the CLI
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_schema::prelude::*;
//!
//! let pool = SqlitePoolOptions::new().connect("sqlite::memory:").await?;
//! let schema = SchemaBuilder::new(pool, Dialect::Sqlite);
//!
//! schema
//!     .create("users", |t| {
//!         t.id();
//!         t.string("email", None).unique();
//!         t.timestamps();
//!     })
//!     .await?;
//!
//! schema
//!     .table("users", |t| {
//!         t.add_string("phone", 20).nullable();
//!     })
//!     .await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the SQL a manifest compiles to
//! oxide-schema --dialect postgresql sql users.json
//!
//! # Apply a manifest
//! oxide-schema --database sqlite:app.db apply users.json
//!
//! # Check for a table
//! oxide-schema has-table users
//! ```

pub mod builder;
pub mod connection;
pub mod error;
pub mod manifest;

pub use builder::SchemaBuilder;
pub use connection::{Connection, DatabasePool};
pub use error::{Result, SchemaError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::SchemaBuilder;
    pub use crate::connection::{Connection, DatabasePool};
    pub use crate::error::{Result, SchemaError};
    pub use crate::manifest::{Manifest, TableManifest};
    pub use oxide_blueprint::{
        Blueprint, BlueprintMode, ColumnType, DefaultValue, Dialect, ForeignKeyAction, Grammar,
    };
}
