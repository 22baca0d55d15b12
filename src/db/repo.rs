use crate::model::{Participant, Submission};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::instrument;

pub type Pool = SqlitePool;

const PARTICIPANT_COLUMNS: &str = "p.user_id, p.display_name, p.chat_id, c.name AS channel_name, p.enrolled_at \
     FROM participants p JOIN channels c ON c.chat_id = p.chat_id";

const STANDUP_COLUMNS: &str = "s.user_id, s.username, s.chat_id, c.name AS channel_name, s.comment, s.submitted_at \
     FROM standups s JOIN channels c ON c.chat_id = s.chat_id";

const IN_WINDOW: &str =
    "datetime(s.submitted_at) >= datetime(?) AND datetime(s.submitted_at) < datetime(?)";

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let pool = SqlitePool::connect(&normalized)
        .await
        .with_context(|| format!("failed to open database {normalized}"))?;
    // Enable WAL and stricter durability.
    sqlx::query("PRAGMA journal_mode=WAL;")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous=FULL;")
        .execute(&pool)
        .await?;
    Ok(pool)
}

/// Expand a leading `~/` in file-backed SQLite URLs, create the parent
/// directory and make sure the file may be created. In-memory and
/// non-sqlite URLs pass through untouched.
fn prepare_sqlite_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return url.to_string();
    };
    if rest.starts_with(":memory") {
        return url.to_string();
    }

    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let (path, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path.is_empty() {
        return url.to_string();
    }

    let path = match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(tail), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), tail),
        _ => path.to_string(),
    };
    if let Some(parent) = std::path::Path::new(&path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    // sqlx refuses to create a missing file unless asked to.
    let query = match query {
        Some(q) if q.contains("mode=") => q.to_string(),
        Some(q) => format!("{q}&mode=rwc"),
        None => "mode=rwc".to_string(),
    };
    format!("sqlite://{path}?{query}")
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn participant_from_row(row: &SqliteRow) -> Result<Participant> {
    Ok(Participant {
        participant_id: row.try_get("user_id")?,
        display_name: row.try_get("display_name")?,
        channel_id: row.try_get("chat_id")?,
        channel_name: row.try_get("channel_name")?,
        enrolled_at: row.try_get("enrolled_at")?,
    })
}

fn submission_from_row(row: &SqliteRow) -> Result<Submission> {
    Ok(Submission {
        author_id: row.try_get("user_id")?,
        author_name: row.try_get("username")?,
        channel_id: row.try_get("chat_id")?,
        channel_name: row.try_get("channel_name")?,
        comment: row.try_get("comment")?,
        submitted_at: row.try_get("submitted_at")?,
    })
}

// --- writes used by the chat surface ---

/// Insert the channel or refresh its display name.
#[instrument(skip_all)]
pub async fn upsert_channel(pool: &Pool, chat_id: &str, name: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO channels (chat_id, name) VALUES (?, ?) \
         ON CONFLICT(chat_id) DO UPDATE SET name = excluded.name",
    )
    .bind(chat_id)
    .bind(name)
    .execute(pool)
    .await?;
    Ok(())
}

/// Enroll a user in a channel. Returns `false` when already enrolled; the
/// original enrollment date is kept in that case.
#[instrument(skip_all)]
pub async fn add_participant(
    pool: &Pool,
    user_id: &str,
    display_name: &str,
    chat_id: &str,
    enrolled_at: DateTime<Utc>,
) -> Result<bool> {
    let inserted = sqlx::query(
        "INSERT INTO participants (user_id, display_name, chat_id, enrolled_at) VALUES (?, ?, ?, ?) \
         ON CONFLICT(user_id, chat_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(display_name)
    .bind(chat_id)
    .bind(enrolled_at)
    .execute(pool)
    .await?
    .rows_affected();
    if inserted == 0 {
        sqlx::query("UPDATE participants SET display_name = ? WHERE user_id = ? AND chat_id = ?")
            .bind(display_name)
            .bind(user_id)
            .bind(chat_id)
            .execute(pool)
            .await?;
    }
    Ok(inserted > 0)
}

#[instrument(skip_all)]
pub async fn remove_participant(pool: &Pool, user_id: &str, chat_id: &str) -> Result<bool> {
    let removed = sqlx::query("DELETE FROM participants WHERE user_id = ? AND chat_id = ?")
        .bind(user_id)
        .bind(chat_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(removed > 0)
}

#[instrument(skip_all)]
pub async fn insert_standup(
    pool: &Pool,
    user_id: &str,
    username: &str,
    chat_id: &str,
    comment: &str,
    submitted_at: DateTime<Utc>,
) -> Result<i64> {
    let rec = sqlx::query(
        "INSERT INTO standups (user_id, username, chat_id, comment, submitted_at) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(username)
    .bind(chat_id)
    .bind(comment)
    .bind(submitted_at)
    .fetch_one(pool)
    .await?;
    Ok(rec.get::<i64, _>("id"))
}

// --- read queries backing reports ---

#[instrument(skip_all)]
pub async fn list_participants_by_channel(pool: &Pool, chat_id: &str) -> Result<Vec<Participant>> {
    let sql = format!("SELECT {PARTICIPANT_COLUMNS} WHERE p.chat_id = ? ORDER BY p.id");
    let rows = sqlx::query(&sql).bind(chat_id).fetch_all(pool).await?;
    rows.iter().map(participant_from_row).collect()
}

#[instrument(skip_all)]
pub async fn find_participants_by_name(pool: &Pool, display_name: &str) -> Result<Vec<Participant>> {
    let sql = format!("SELECT {PARTICIPANT_COLUMNS} WHERE p.display_name = ? ORDER BY p.id");
    let rows = sqlx::query(&sql).bind(display_name).fetch_all(pool).await?;
    rows.iter().map(participant_from_row).collect()
}

#[instrument(skip_all)]
pub async fn find_participant_in_channel_name(
    pool: &Pool,
    display_name: &str,
    channel_name: &str,
) -> Result<Option<Participant>> {
    let sql = format!(
        "SELECT {PARTICIPANT_COLUMNS} WHERE p.display_name = ? AND c.name = ? ORDER BY p.id LIMIT 1"
    );
    let row = sqlx::query(&sql)
        .bind(display_name)
        .bind(channel_name)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(participant_from_row).transpose()
}

#[instrument(skip_all)]
pub async fn select_standups_by_channel_for_period(
    pool: &Pool,
    chat_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Submission>> {
    let sql = format!(
        "SELECT {STANDUP_COLUMNS} WHERE s.chat_id = ? AND {IN_WINDOW} ORDER BY datetime(s.submitted_at), s.id"
    );
    let rows = sqlx::query(&sql)
        .bind(chat_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
    rows.iter().map(submission_from_row).collect()
}

#[instrument(skip_all)]
pub async fn select_standups_for_period(
    pool: &Pool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Submission>> {
    let sql = format!(
        "SELECT {STANDUP_COLUMNS} WHERE {IN_WINDOW} ORDER BY datetime(s.submitted_at), s.id"
    );
    let rows = sqlx::query(&sql).bind(from).bind(to).fetch_all(pool).await?;
    rows.iter().map(submission_from_row).collect()
}

#[instrument(skip_all)]
pub async fn select_standups_by_channel_name_for_period(
    pool: &Pool,
    channel_name: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Submission>> {
    let sql = format!(
        "SELECT {STANDUP_COLUMNS} WHERE c.name = ? AND {IN_WINDOW} ORDER BY datetime(s.submitted_at), s.id"
    );
    let rows = sqlx::query(&sql)
        .bind(channel_name)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
    rows.iter().map(submission_from_row).collect()
}
