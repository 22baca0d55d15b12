use crate::reporting::{midnight, start_of_day};
use chrono::{DateTime, NaiveDate, Utc};
use teloxide::utils::command::BotCommands;
use thiserror::Error;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Standup bot commands:")]
pub enum Command {
    #[command(description = "show this text.")]
    Help,
    #[command(description = "start submitting standups in this chat.")]
    Join,
    #[command(description = "stop submitting standups in this chat.")]
    Leave,
    #[command(description = "list who is expected to report here.")]
    Members,
    #[command(description = "reply to someone's message to enroll them here.")]
    Add,
    #[command(description = "reply to someone's message to drop them from this chat.")]
    Remove,
    #[command(description = "submit today's standup: /standup <text>")]
    Standup(String),
    #[command(description = "report on this chat: /report [FROM [TO]]")]
    Report(String),
    #[command(description = "report on a user everywhere: /report_user <name> [FROM [TO]]")]
    ReportUser(String),
    #[command(description = "report on a user in this chat: /report_member <name> [FROM [TO]]")]
    ReportMember(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("a user name is required")]
    MissingName,
    #[error("cannot parse date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("unexpected argument '{0}'")]
    Unexpected(String),
}

/// Parsed `[name] [FROM [TO]]` arguments of the report commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArgs {
    pub name: Option<String>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// FROM defaults to the start of today and TO to `now`. Dates are UTC
/// midnights, so `TO = today` covers today as a whole day.
pub fn parse_report_args(
    args: &str,
    with_name: bool,
    now: DateTime<Utc>,
) -> Result<ReportArgs, ArgsError> {
    let mut words = args.split_whitespace();
    let name = if with_name {
        let raw = words.next().ok_or(ArgsError::MissingName)?;
        let name = raw.trim_start_matches('@');
        if name.is_empty() {
            return Err(ArgsError::MissingName);
        }
        Some(name.to_string())
    } else {
        None
    };

    let from = match words.next() {
        Some(word) => parse_date(word)?,
        None => midnight(now),
    };
    let to = match words.next() {
        Some(word) => parse_date(word)?,
        None => now,
    };
    if let Some(extra) = words.next() {
        return Err(ArgsError::Unexpected(extra.to_string()));
    }
    Ok(ReportArgs { name, from, to })
}

fn parse_date(word: &str) -> Result<DateTime<Utc>, ArgsError> {
    NaiveDate::parse_from_str(word, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| ArgsError::InvalidDate(word.to_string()))
}
