//! oxide-schema CLI
//!
//! Command-line tool for compiling and applying table manifests.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use oxide_schema::builder::compile_blueprint;
use oxide_schema::prelude::*;

/// Compile and apply table blueprints.
#[derive(Parser)]
#[command(name = "oxide-schema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or PostgreSQL connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// SQL dialect (sqlite, pgsql, postgres, postgresql). Inferred from the
    /// database URL when omitted.
    #[arg(long)]
    dialect: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL a manifest compiles to, without connecting.
    Sql {
        /// Manifest file.
        manifest: PathBuf,
    },

    /// Apply a manifest to the database.
    Apply {
        /// Manifest file.
        manifest: PathBuf,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Check whether a table exists.
    HasTable {
        /// Table name.
        table: String,
    },

    /// Drop a table.
    Drop {
        /// Table name.
        table: String,

        /// Do not fail when the table is missing.
        #[arg(long)]
        if_exists: bool,
    },

    /// Rename a table.
    Rename {
        /// Current table name.
        from: String,
        /// New table name.
        to: String,
    },
}

fn resolve_dialect(cli: &Cli) -> Dialect {
    match cli.dialect.as_deref() {
        Some(name) => name.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to the sqlite grammar");
            Dialect::Sqlite
        }),
        None => DatabasePool::dialect_for_url(&cli.database),
    }
}

fn print_statements(statements: &[String]) {
    for sql in statements {
        println!("{sql};");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dialect = resolve_dialect(&cli);

    // `sql` never needs a connection.
    if let Commands::Sql { manifest } = &cli.command {
        let manifest = Manifest::load(manifest)?;
        let grammar = dialect.grammar();
        for blueprint in manifest.blueprints()? {
            print_statements(&compile_blueprint(grammar.as_ref(), &blueprint)?);
        }
        return Ok(());
    }

    // Connect to database
    let pool = DatabasePool::connect(&cli.database).await?;
    if pool.dialect() != dialect {
        warn!(
            connection = %pool.dialect(),
            grammar = %dialect,
            "Dialect does not match the database URL"
        );
    }

    match cli.command {
        Commands::Sql { .. } => {}

        Commands::Apply { manifest, dry_run } => {
            let schema = SchemaBuilder::new(pool, dialect).dry_run(dry_run);
            let manifest = Manifest::load(&manifest)?;
            info!(
                manifest = %manifest.path().display(),
                tables = manifest.tables().len(),
                "Loaded manifest"
            );

            if dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
            }

            for blueprint in manifest.blueprints()? {
                let statements = schema.apply(&blueprint).await?;
                if dry_run {
                    print_statements(&statements);
                } else {
                    info!(
                        table = blueprint.table(),
                        statements = statements.len(),
                        "Applied"
                    );
                }
            }
        }

        Commands::HasTable { table } => {
            let schema = SchemaBuilder::new(pool, dialect);
            if schema.has_table(&table).await {
                println!("{table}: present");
            } else {
                println!("{table}: missing");
                std::process::exit(1);
            }
        }

        Commands::Drop { table, if_exists } => {
            let schema = SchemaBuilder::new(pool, dialect);
            if if_exists {
                schema.drop_if_exists(&table).await?;
            } else {
                schema.drop(&table).await?;
            }
            info!(table = %table, "Table dropped");
        }

        Commands::Rename { from, to } => {
            let schema = SchemaBuilder::new(pool, dialect);
            schema.rename(&from, &to).await?;
            info!(from = %from, to = %to, "Table renamed");
        }
    }

    Ok(())
}
