//! Apply pending schema migrations to the configured database.

use std::env;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ya_backend::outbound::persistence::run_pending_migrations;

/// `migrate` command arguments.
#[derive(Debug, Parser)]
#[command(name = "migrate", about = "Apply pending database migrations", version)]
struct CliArgs {
    /// Database connection URL. Falls back to `YA_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let database_url = match args.database_url {
        Some(url) => url,
        None => env::var("YA_DATABASE_URL")
            .map_err(|_| eyre!("pass --database-url or set YA_DATABASE_URL"))?,
    };

    let applied =
        run_pending_migrations(&database_url).wrap_err("failed to migrate the database")?;
    if applied.is_empty() {
        println!("no pending migrations");
    }
    for version in applied {
        println!("applied {version}");
    }
    Ok(())
}
