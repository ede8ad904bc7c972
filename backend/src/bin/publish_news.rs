//! Publish one news item. News has no web form; editors use this command.

use std::env;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use ya_backend::domain::ports::NewsService;
use ya_backend::domain::{NewsDraft, NewsServiceImpl};
use ya_backend::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselNewsRepository, PoolConfig,
};

/// `publish-news` command arguments.
#[derive(Debug, Parser)]
#[command(name = "publish-news", about = "Publish a news item", version)]
struct CliArgs {
    /// Headline.
    #[arg(long)]
    title: String,
    /// Body text.
    #[arg(long)]
    text: String,
    /// Publication date as `YYYY-MM-DD`; defaults to today.
    #[arg(long, value_name = "date")]
    date: Option<NaiveDate>,
    /// Database connection URL. Falls back to `YA_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(publish(args))
}

async fn publish(args: CliArgs) -> Result<()> {
    let database_url = match args.database_url {
        Some(url) => url,
        None => env::var("YA_DATABASE_URL")
            .map_err(|_| eyre!("pass --database-url or set YA_DATABASE_URL"))?,
    };
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to create database pool")?;
    let service = NewsServiceImpl::new(
        Arc::new(DieselNewsRepository::new(pool.clone())),
        Arc::new(DieselCommentRepository::new(pool)),
        Arc::new(DefaultClock),
    );

    let news = service
        .publish(NewsDraft {
            title: args.title,
            text: args.text,
            date: args.date,
        })
        .await
        .map_err(|error| eyre!("failed to publish: {error}"))?;

    println!("id={}", news.id().get());
    println!("date={}", news.date());
    Ok(())
}
