//! Schema builder.
//!
//! This module compiles blueprints with a dialect grammar and applies the
//! resulting statements to a [`Connection`], one at a time and in order.

use oxide_blueprint::{Blueprint, BlueprintMode, Dialect, Grammar};
use tracing::{debug, error, info, warn};

use crate::connection::Connection;
use crate::error::{Result, SchemaError};

/// Builds and applies table-level schema changes.
pub struct SchemaBuilder<C> {
    connection: C,
    grammar: Box<dyn Grammar>,
    dry_run: bool,
}

impl<C: Connection> SchemaBuilder<C> {
    /// Creates a builder for `dialect`.
    pub fn new(connection: C, dialect: Dialect) -> Self {
        Self {
            connection,
            grammar: dialect.grammar(),
            dry_run: false,
        }
    }

    /// Creates a builder from a dialect identifier, falling back to SQLite
    /// when the identifier is not recognized.
    pub fn for_dialect_name(connection: C, name: &str) -> Self {
        let dialect = name.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to the sqlite grammar");
            Dialect::Sqlite
        });
        Self::new(connection, dialect)
    }

    /// Enables dry-run mode (statements are returned but not executed).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.grammar.dialect()
    }

    /// Returns the grammar.
    #[must_use]
    pub fn grammar(&self) -> &dyn Grammar {
        self.grammar.as_ref()
    }

    /// Returns the connection.
    #[must_use]
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Compiles a blueprint into the statements its mode calls for.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if an alter command is not supported
    /// by the dialect.
    pub fn compile(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        compile_blueprint(self.grammar.as_ref(), blueprint)
    }

    /// Compiles the statements `create` would execute.
    #[must_use]
    pub fn create_sql(&self, table: &str, configure: impl FnOnce(&mut Blueprint)) -> Vec<String> {
        let mut blueprint = Blueprint::create(table);
        configure(&mut blueprint);
        let mut statements = vec![self.grammar.compile_create(&blueprint)];
        statements.extend(self.grammar.compile_create_indexes(&blueprint));
        statements
    }

    /// Compiles the statements `table` would execute.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if an alter command is not supported
    /// by the dialect.
    pub fn table_sql(
        &self,
        table: &str,
        configure: impl FnOnce(&mut Blueprint),
    ) -> Result<Vec<String>> {
        let mut blueprint = Blueprint::alter(table);
        configure(&mut blueprint);
        self.compile(&blueprint)
    }

    /// Creates a table.
    pub async fn create(
        &self,
        table: &str,
        configure: impl FnOnce(&mut Blueprint),
    ) -> Result<Vec<String>> {
        let mut blueprint = Blueprint::create(table);
        configure(&mut blueprint);
        self.apply(&blueprint).await
    }

    /// Alters a table. Commands run in declaration order; execution stops at
    /// the first failing statement and earlier statements stay applied.
    pub async fn table(
        &self,
        table: &str,
        configure: impl FnOnce(&mut Blueprint),
    ) -> Result<Vec<String>> {
        let mut blueprint = Blueprint::alter(table);
        configure(&mut blueprint);
        self.apply(&blueprint).await
    }

    /// Compiles and executes an already populated blueprint.
    pub async fn apply(&self, blueprint: &Blueprint) -> Result<Vec<String>> {
        let operation = match blueprint.mode() {
            BlueprintMode::Create => "create",
            BlueprintMode::Alter => "alter",
        };
        let statements = self.compile(blueprint)?;
        self.run(blueprint.table(), operation, statements).await
    }

    /// Drops a table.
    pub async fn drop(&self, table: &str) -> Result<Vec<String>> {
        let sql = self.grammar.compile_drop_table(table);
        self.run(table, "drop", vec![sql]).await
    }

    /// Drops a table if it exists.
    pub async fn drop_if_exists(&self, table: &str) -> Result<Vec<String>> {
        let sql = self.grammar.compile_drop_table_if_exists(table);
        self.run(table, "drop", vec![sql]).await
    }

    /// Renames a table.
    pub async fn rename(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let sql = self.grammar.compile_rename_table(from, to);
        self.run(from, "rename", vec![sql]).await
    }

    /// Checks whether a table exists. Query errors count as "absent".
    pub async fn has_table(&self, table: &str) -> bool {
        let sql = self.grammar.compile_table_exists(table);
        debug!(sql = %sql, "Executing SQL");
        match self.connection.query_count(&sql).await {
            Ok(count) => count > 0,
            Err(e) => {
                debug!(table, error = %e, "Table lookup failed, reporting it as missing");
                false
            }
        }
    }

    async fn run(
        &self,
        table: &str,
        operation: &'static str,
        statements: Vec<String>,
    ) -> Result<Vec<String>> {
        info!(
            table,
            operation,
            statements = statements.len(),
            dry_run = self.dry_run,
            "Applying schema change"
        );

        if self.dry_run {
            return Ok(statements);
        }

        for (position, sql) in statements.iter().enumerate() {
            debug!(sql = %sql, "Executing SQL");
            if let Err(e) = self.connection.execute(sql).await {
                error!(table, operation, position, error = %e, "Statement failed");
                return Err(SchemaError::Execution {
                    table: table.to_string(),
                    operation,
                    position,
                    statement: sql.clone(),
                    source: Box::new(e),
                });
            }
        }

        Ok(statements)
    }
}

/// Compiles a blueprint with `grammar` according to its mode.
///
/// Create mode yields the `CREATE TABLE` statement followed by its
/// `CREATE INDEX` statements; alter mode yields one element per command.
/// Entries the chosen algorithm ignores are logged at `warn`.
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] if an alter command is not supported
/// by the dialect.
pub fn compile_blueprint(grammar: &dyn Grammar, blueprint: &Blueprint) -> Result<Vec<String>> {
    let table = blueprint.table();
    match blueprint.mode() {
        BlueprintMode::Create => {
            if !blueprint.commands().is_empty() {
                warn!(
                    table,
                    ignored = blueprint.commands().len(),
                    "Alter commands are ignored when creating a table"
                );
            }
            let mut statements = vec![grammar.compile_create(blueprint)];
            statements.extend(grammar.compile_create_indexes(blueprint));
            Ok(statements)
        }
        BlueprintMode::Alter => {
            let ignored = blueprint.columns().len() + blueprint.indexes().len();
            if ignored > 0 {
                warn!(
                    table,
                    ignored,
                    "Column and index definitions are ignored when altering a table"
                );
            }
            Ok(grammar.compile_alter(blueprint)?)
        }
    }
}
