use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info};

use standup_bot::config;
use standup_bot::db;
use standup_bot::handlers::{self, BotState};
use standup_bot::i18n::Localizer;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
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
    cfg.ensure_dirs()?;

    let pool = db::init_pool(&cfg.database_url()).await?;
    db::run_migrations(&pool).await?;

    let localizer = Localizer::new(&cfg.app.language)?;
    let bot = Bot::new(cfg.telegram.bot_token.clone());
    let me = bot.get_me().await.context("failed to query bot identity")?;

    let state = BotState {
        pool,
        localizer: Arc::new(localizer),
        telegram: cfg.telegram.clone(),
        bot_username: me.username().to_string(),
    };

    info!(bot = %state.bot_username, language = %cfg.app.language, "starting telegram bot");
    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let state = state.clone();
        async move {
            if let Err(err) = handlers::handle_update(&bot, &state, &msg).await {
                error!(?err, "failed to handle update");
            }
            respond(())
        }
    })
    .await;

    Ok(())
}
