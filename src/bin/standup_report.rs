use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use standup_bot::config;
use standup_bot::db::{self, SqliteStore};
use standup_bot::i18n::Localizer;
use standup_bot::reporting::{self, start_of_day, Scope};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Print a standup attendance report straight from the database"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Report on one channel (Telegram chat id)
    #[arg(long, conflicts_with = "user")]
    channel_id: Option<String>,

    /// Channel name; a header label with --channel-id, a filter with --user
    #[arg(long)]
    channel_name: Option<String>,

    /// Report on one user by display name
    #[arg(long)]
    user: Option<String>,

    /// First day, YYYY-MM-DD (UTC)
    #[arg(long)]
    from: NaiveDate,

    /// Last day, YYYY-MM-DD (UTC); defaults to now
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Print report entries as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn scope_from_args(args: &Args) -> Result<Scope> {
    match (&args.channel_id, &args.user, &args.channel_name) {
        (Some(id), None, name) => Ok(Scope::channel(
            id.as_str(),
            name.as_deref().unwrap_or(id.as_str()),
        )),
        (None, Some(user), Some(channel)) => Ok(Scope::channel_and_user(channel.as_str(), user.as_str())),
        (None, Some(user), None) => Ok(Scope::user(user.as_str())),
        _ => bail!("pass either --channel-id or --user"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    let scope = scope_from_args(&args)?;

    let pool = db::init_pool(&cfg.database_url()).await?;
    db::run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);

    let now = Utc::now();
    let from = start_of_day(args.from);
    let to = args.to.map(start_of_day).unwrap_or(now);
    info!(%scope, %from, %to, "generating report");

    if args.json {
        let entries = reporting::build_entries(&store, &scope, from, to, now).await?;
        let out = serde_json::json!({ "scope": scope, "entries": entries });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let localizer = Localizer::new(&cfg.app.language)?;
    let text = reporting::standup_report(&store, &localizer, &scope, from, to, now)
        .await
        .with_context(|| format!("report for {scope} failed"))?;
    println!("{text}");
    Ok(())
}
