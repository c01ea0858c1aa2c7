//! misite content loader.
//!
//! Usage:
//!   misite-load --source articles.json --target postgres://... --entity a --action add

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use misite_cli::loader;
use misite_core::ingest::{EntityKind, LoadAction};
use misite_db::PoolSettings;

/// Load a batch of content records into the database.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file shaped `{"data": [...]}`.
    #[arg(long)]
    source: PathBuf,

    /// Database connection string.
    #[arg(long, env = "DATABASE_URL")]
    target: String,

    /// Target table: a|articles, at|article_tags, p|projects, pt|project_tags,
    /// pl|project_links, t|tags, s|series.
    #[arg(long)]
    entity: EntityKind,

    /// a|add, u|update, d|delete.
    #[arg(long)]
    action: LoadAction,

    /// Schema to put on the connection search path.
    #[arg(long, env = "DB_SCHEMA")]
    schema: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "misite_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let plan = loader::prepare(&args.source, args.entity, args.action)
        .with_context(|| format!("Cannot {} {}", args.action, args.entity))?;

    if plan.is_empty() {
        tracing::info!(source = %args.source.display(), "Nothing to load");
        return Ok(());
    }

    let settings = PoolSettings {
        max_connections: 1,
        schema: args.schema.as_deref(),
        ..PoolSettings::new(&args.target)
    };
    let pool = misite_db::create_pool(&settings)
        .await
        .context("Failed to connect to database")?;

    let affected = loader::execute(&pool, &plan)
        .await
        .with_context(|| format!("Failed to {} {}", args.action, args.entity))?;
    pool.close().await;

    tracing::info!(
        entity = %plan.kind(),
        action = %args.action,
        records = plan.len(),
        affected,
        "Batch applied"
    );
    Ok(())
}
