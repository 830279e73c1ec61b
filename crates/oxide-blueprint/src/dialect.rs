//! Dialect identifiers and grammar selection.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownDialectError;
use crate::grammar::{Grammar, PostgresGrammar, SqliteGrammar};

/// A supported SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// SQLite (the default).
    #[default]
    Sqlite,
    /// PostgreSQL.
    Postgres,
}

impl Dialect {
    /// Returns the canonical identifier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgresql",
        }
    }

    /// Parses `name`, falling back to SQLite for unrecognized identifiers.
    ///
    /// Prefer [`str::parse`] where a misconfigured dialect should be caught.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Returns the grammar for this dialect.
    #[must_use]
    pub fn grammar(self) -> Box<dyn Grammar> {
        match self {
            Self::Sqlite => Box::new(SqliteGrammar::new()),
            Self::Postgres => Box::new(PostgresGrammar::new()),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "pgsql" | "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(UnknownDialectError(s.to_string())),
        }
    }
}

/// Returns the grammar for a dialect identifier, using the SQLite grammar
/// when the identifier is not recognized.
#[must_use]
pub fn grammar_for(name: &str) -> Box<dyn Grammar> {
    Dialect::from_name_or_default(name).grammar()
}
