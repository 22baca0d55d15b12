use chrono::{DateTime, TimeZone, Utc};
use standup_bot::commands::Command;
use standup_bot::config::Telegram;
use standup_bot::db;
use standup_bot::handlers::{execute, ChatContext, ReplyTarget};
use standup_bot::i18n::Localizer;

async fn setup_pool() -> sqlx::SqlitePool {
    let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

fn at(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, d, h, 0, 0).unwrap()
}

fn admins(ids: &[i64]) -> Telegram {
    Telegram {
        bot_token: "t".into(),
        admins: ids.to_vec(),
    }
}

fn ctx(user_id: i64, user_name: &str) -> ChatContext {
    ChatContext {
        chat_id: "-42".into(),
        chat_name: "team".into(),
        user_id,
        user_name: user_name.into(),
        reply_to: None,
    }
}

fn replying_to(mut ctx: ChatContext, user_id: i64, user_name: &str) -> ChatContext {
    ctx.reply_to = Some(ReplyTarget {
        user_id,
        user_name: user_name.into(),
    });
    ctx
}

#[tokio::test]
async fn join_standup_and_report() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[]);

    let reply = execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Join, at(7, 8)).await.unwrap();
    assert_eq!(reply, "ann will now be expected to submit standups in #team.");
    execute(&pool, &l, &tg, &ctx(2, "bo"), Command::Join, at(7, 8)).await.unwrap();

    let reply = execute(
        &pool,
        &l,
        &tg,
        &ctx(1, "ann"),
        Command::Standup("  shipped the importer ".into()),
        at(7, 9),
    )
    .await
    .unwrap();
    assert_eq!(reply, "Standup saved, thank you ann!");

    let reply = execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Report(String::new()), at(7, 12))
        .await
        .unwrap();
    assert_eq!(
        reply,
        "Full report on channel #team:\n\n\
         Report from 2024-10-07 to 2024-10-08:\n\
         ann commented: shipped the importer\n\
         bo did not submit standup!\n"
    );
}

#[tokio::test]
async fn joining_twice_keeps_first_enrollment() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[]);

    execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Join, at(1, 8)).await.unwrap();
    execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Join, at(9, 8)).await.unwrap();

    let members = db::list_participants_by_channel(&pool, "-42").await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].enrolled_at, at(1, 8));
}

#[tokio::test]
async fn members_and_leave() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[]);

    let reply = execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Members, at(7, 8)).await.unwrap();
    assert_eq!(reply, "Nobody is enrolled in #team yet.");

    execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Join, at(7, 8)).await.unwrap();
    execute(&pool, &l, &tg, &ctx(2, "bo"), Command::Join, at(7, 8)).await.unwrap();
    let reply = execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Members, at(7, 8)).await.unwrap();
    assert_eq!(reply, "Participants of #team: ann, bo");

    let reply = execute(&pool, &l, &tg, &ctx(2, "bo"), Command::Leave, at(7, 9)).await.unwrap();
    assert_eq!(reply, "bo removed from #team.");
    let reply = execute(&pool, &l, &tg, &ctx(2, "bo"), Command::Leave, at(7, 9)).await.unwrap();
    assert_eq!(reply, "bo is not a participant of #team.");
}

#[tokio::test]
async fn reports_require_admin() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[7]);

    let reply = execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Report(String::new()), at(7, 8))
        .await
        .unwrap();
    assert_eq!(reply, "Only bot admins may use this command.");

    let reply = execute(&pool, &l, &tg, &ctx(7, "boss"), Command::Report(String::new()), at(7, 8))
        .await
        .unwrap();
    assert!(reply.ends_with("No data for this period"));

    // non-report commands stay open to everyone
    let reply = execute(&pool, &l, &tg, &ctx(1, "ann"), Command::Join, at(7, 8)).await.unwrap();
    assert!(reply.starts_with("ann will now"));
}

#[tokio::test]
async fn bad_arguments_get_usage_text() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[]);
    let c = ctx(1, "ann");

    let reply = execute(&pool, &l, &tg, &c, Command::ReportUser(String::new()), at(7, 8))
        .await
        .unwrap();
    assert_eq!(reply, "Usage: /report_user <name> [YYYY-MM-DD [YYYY-MM-DD]]");

    let reply = execute(&pool, &l, &tg, &c, Command::Report("last-week".into()), at(7, 8))
        .await
        .unwrap();
    assert_eq!(reply, "Cannot parse date 'last-week', expected YYYY-MM-DD.");

    let reply = execute(&pool, &l, &tg, &c, Command::Standup("   ".into()), at(7, 8))
        .await
        .unwrap();
    assert_eq!(reply, "Usage: /standup <what you did, what you plan, blockers>");
}

#[tokio::test]
async fn future_range_is_reported_as_error() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[]);

    let reply = execute(
        &pool,
        &l,
        &tg,
        &ctx(1, "ann"),
        Command::Report("2024-10-01 2024-10-20".into()),
        at(7, 8),
    )
    .await
    .unwrap();
    assert!(reply.starts_with("Error! "), "{reply}");
}

#[tokio::test]
async fn member_report_in_russian_falls_back_for_missing_keys() {
    let pool = setup_pool().await;
    let l = Localizer::new("ru").unwrap();
    let tg = admins(&[]);
    let c = ctx(1, "ann");

    let reply = execute(&pool, &l, &tg, &c, Command::ReportMember(String::new()), at(7, 8))
        .await
        .unwrap();
    assert_eq!(reply, "Usage: /report_member <name> [YYYY-MM-DD [YYYY-MM-DD]]");

    let reply = execute(&pool, &l, &tg, &c, Command::ReportMember("ann".into()), at(7, 8))
        .await
        .unwrap();
    assert!(reply.ends_with("Нет данных за этот период"), "{reply}");
}

#[tokio::test]
async fn member_report_in_chat_with_hash_in_title() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[]);
    let mut c = ctx(1, "ann");
    c.chat_name = "Team #1".into();

    execute(&pool, &l, &tg, &c, Command::Join, at(7, 8)).await.unwrap();
    execute(&pool, &l, &tg, &c, Command::Standup("shipped".into()), at(7, 9))
        .await
        .unwrap();

    let reply = execute(
        &pool,
        &l,
        &tg,
        &c,
        Command::ReportMember("ann 2024-10-07".into()),
        at(7, 12),
    )
    .await
    .unwrap();
    assert_eq!(
        reply,
        "Report on user ann in channel #Team #1:\n\n\
         Report from 2024-10-07 to 2024-10-08:\n\
         ann commented: shipped\n"
    );
}

#[tokio::test]
async fn admin_adds_and_removes_replied_user() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[7]);
    let boss = ctx(7, "boss");

    let reply = execute(&pool, &l, &tg, &boss, Command::Add, at(7, 8)).await.unwrap();
    assert_eq!(reply, "Reply to a message of the user you want to add or remove.");

    let reply = execute(&pool, &l, &tg, &replying_to(boss.clone(), 3, "cy"), Command::Add, at(7, 8))
        .await
        .unwrap();
    assert_eq!(reply, "cy will now be expected to submit standups in #team.");

    let members = db::list_participants_by_channel(&pool, "-42").await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].participant_id, "3");
    assert_eq!(members[0].enrolled_at, at(7, 8));

    let reply = execute(&pool, &l, &tg, &replying_to(boss.clone(), 3, "cy"), Command::Remove, at(7, 9))
        .await
        .unwrap();
    assert_eq!(reply, "cy removed from #team.");
    let reply = execute(&pool, &l, &tg, &replying_to(boss, 3, "cy"), Command::Remove, at(7, 9))
        .await
        .unwrap();
    assert_eq!(reply, "cy is not a participant of #team.");
    assert!(db::list_participants_by_channel(&pool, "-42").await.unwrap().is_empty());
}

#[tokio::test]
async fn add_and_remove_require_admin() {
    let pool = setup_pool().await;
    let l = Localizer::new("en").unwrap();
    let tg = admins(&[7]);
    let ann = replying_to(ctx(1, "ann"), 3, "cy");

    execute(&pool, &l, &tg, &ctx(3, "cy"), Command::Join, at(7, 8)).await.unwrap();

    let reply = execute(&pool, &l, &tg, &ann, Command::Add, at(7, 8)).await.unwrap();
    assert_eq!(reply, "Only bot admins may use this command.");
    let reply = execute(&pool, &l, &tg, &ann, Command::Remove, at(7, 8)).await.unwrap();
    assert_eq!(reply, "Only bot admins may use this command.");

    let members = db::list_participants_by_channel(&pool, "-42").await.unwrap();
    assert_eq!(members.len(), 1);
}
