use crate::commands::{parse_report_args, ArgsError, Command};
use crate::config::Telegram as TelegramCfg;
use crate::db::{self, Pool, SqliteStore};
use crate::i18n::Localizer;
use crate::reporting::{self, Scope};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::User;
use teloxide::utils::command::BotCommands;
use tracing::{info, instrument, warn};

/// Shared state handed to every update.
#[derive(Clone)]
pub struct BotState {
    pub pool: Pool,
    pub localizer: Arc<Localizer>,
    pub telegram: TelegramCfg,
    pub bot_username: String,
}

/// Author of the message a command replied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub user_id: i64,
    pub user_name: String,
}

/// Who sent a command and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub chat_id: String,
    pub chat_name: String,
    pub user_id: i64,
    pub user_name: String,
    pub reply_to: Option<ReplyTarget>,
}

fn display_name(user: &User) -> String {
    user.username.clone().unwrap_or_else(|| user.full_name())
}

impl ChatContext {
    fn from_message(msg: &Message) -> Option<Self> {
        let user = msg.from()?;
        let chat_name = msg
            .chat
            .title()
            .or_else(|| msg.chat.username())
            .map(str::to_owned)
            .unwrap_or_else(|| msg.chat.id.0.to_string());
        let reply_to = msg
            .reply_to_message()
            .and_then(Message::from)
            .filter(|author| !author.is_bot)
            .map(|author| ReplyTarget {
                user_id: author.id.0 as i64,
                user_name: display_name(author),
            });
        Some(Self {
            chat_id: msg.chat.id.0.to_string(),
            chat_name,
            user_id: user.id.0 as i64,
            user_name: display_name(user),
            reply_to,
        })
    }
}

#[instrument(skip_all)]
pub async fn handle_update(bot: &Bot, state: &BotState, msg: &Message) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Ok(command) = Command::parse(text, &state.bot_username) else {
        return Ok(());
    };
    let Some(ctx) = ChatContext::from_message(msg) else {
        return Ok(());
    };

    let reply = execute(
        &state.pool,
        &state.localizer,
        &state.telegram,
        &ctx,
        command,
        Utc::now(),
    )
    .await?;
    if !reply.is_empty() {
        bot.send_message(msg.chat.id, reply).await?;
    }
    Ok(())
}

/// Run one command and return the reply text.
#[instrument(skip_all, fields(chat = %ctx.chat_id, user = ctx.user_id))]
pub async fn execute(
    pool: &Pool,
    localizer: &Localizer,
    telegram: &TelegramCfg,
    ctx: &ChatContext,
    command: Command,
    now: DateTime<Utc>,
) -> Result<String> {
    let channel = ctx.chat_name.as_str();
    let user = ctx.user_name.as_str();
    let user_id = ctx.user_id.to_string();

    let needs_admin = matches!(
        command,
        Command::Members
            | Command::Add
            | Command::Remove
            | Command::Report(_) | Command::ReportUser(_) | Command::ReportMember(_)
    );
    if needs_admin && !telegram.is_admin(ctx.user_id) {
        return Ok(localizer.lookup("permission_denied", &[]));
    }

    match command {
        Command::Help => Ok(Command::descriptions().to_string()),
        Command::Join => {
            db::upsert_channel(pool, &ctx.chat_id, channel).await?;
            let added = db::add_participant(pool, &user_id, user, &ctx.chat_id, now).await?;
            info!(added, "join");
            Ok(localizer.lookup("join_ok", &[("user", user), ("channel", channel)]))
        }
        Command::Leave => {
            let key = if db::remove_participant(pool, &user_id, &ctx.chat_id).await? {
                "leave_ok"
            } else {
                "leave_missing"
            };
            Ok(localizer.lookup(key, &[("user", user), ("channel", channel)]))
        }
        Command::Add => {
            let Some(target) = &ctx.reply_to else {
                return Ok(localizer.lookup("reply_required", &[]));
            };
            let target_id = target.user_id.to_string();
            let target_name = target.user_name.as_str();
            db::upsert_channel(pool, &ctx.chat_id, channel).await?;
            let added = db::add_participant(pool, &target_id, target_name, &ctx.chat_id, now).await?;
            info!(added, target = target.user_id, "add");
            Ok(localizer.lookup("join_ok", &[("user", target_name), ("channel", channel)]))
        }
        Command::Remove => {
            let Some(target) = &ctx.reply_to else {
                return Ok(localizer.lookup("reply_required", &[]));
            };
            let target_name = target.user_name.as_str();
            let removed =
                db::remove_participant(pool, &target.user_id.to_string(), &ctx.chat_id).await?;
            info!(removed, target = target.user_id, "remove");
            let key = if removed { "leave_ok" } else { "leave_missing" };
            Ok(localizer.lookup(key, &[("user", target_name), ("channel", channel)]))
        }
        Command::Members => {
            let members = db::list_participants_by_channel(pool, &ctx.chat_id).await?;
            if members.is_empty() {
                return Ok(localizer.lookup("members_empty", &[("channel", channel)]));
            }
            let names: Vec<&str> = members.iter().map(|p| p.display_name.as_str()).collect();
            Ok(localizer.lookup(
                "members_list",
                &[("channel", channel), ("members", names.join(", ").as_str())],
            ))
        }
        Command::Standup(text) => {
            let comment = text.trim();
            if comment.is_empty() {
                return Ok(localizer.lookup("standup_empty", &[]));
            }
            db::upsert_channel(pool, &ctx.chat_id, channel).await?;
            db::insert_standup(pool, &user_id, user, &ctx.chat_id, comment, now).await?;
            info!("standup saved");
            Ok(localizer.lookup("standup_saved", &[("user", user)]))
        }
        Command::Report(args) => match parse_report_args(&args, false, now) {
            Ok(args) => {
                let scope = Scope::channel(ctx.chat_id.as_str(), channel);
                Ok(report(pool, localizer, &scope, args.from, args.to, now).await)
            }
            Err(err) => Ok(args_error(localizer, "usage_report", err)),
        },
        Command::ReportUser(args) => match parse_report_args(&args, true, now) {
            Ok(args) => {
                let scope = Scope::user(args.name.unwrap_or_default());
                Ok(report(pool, localizer, &scope, args.from, args.to, now).await)
            }
            Err(err) => Ok(args_error(localizer, "usage_report_user", err)),
        },
        Command::ReportMember(args) => match parse_report_args(&args, true, now) {
            Ok(args) => {
                let scope = Scope::channel_and_user(channel, args.name.unwrap_or_default());
                Ok(report(pool, localizer, &scope, args.from, args.to, now).await)
            }
            Err(err) => Ok(args_error(localizer, "usage_report_member", err)),
        },
    }
}

async fn report(
    pool: &Pool,
    localizer: &Localizer,
    scope: &Scope,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> String {
    let store = SqliteStore::new(pool.clone());
    match reporting::standup_report(&store, localizer, scope, from, to, now).await {
        Ok(text) => text,
        Err(err) => {
            warn!(%err, %scope, "report failed");
            reporting::error_message(localizer, &err)
        }
    }
}

fn args_error(localizer: &Localizer, usage_key: &str, err: ArgsError) -> String {
    match err {
        ArgsError::InvalidDate(value) => {
            localizer.lookup("invalid_date", &[("value", value.as_str())])
        }
        ArgsError::MissingName | ArgsError::Unexpected(_) => localizer.lookup(usage_key, &[]),
    }
}
