//! Print the OpenAPI document of one site as JSON.

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use ya_backend::ApiDoc;
use ya_backend::server::Site;

/// `openapi-dump` command arguments.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Print the OpenAPI document", version)]
struct CliArgs {
    /// `notes` or `news`.
    #[arg(long, default_value = "notes")]
    site: Site,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let json = ApiDoc::for_site(args.site)
        .to_pretty_json()
        .wrap_err("failed to serialise the OpenAPI document")?;
    println!("{json}");
    Ok(())
}
