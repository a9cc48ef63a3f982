use chrono::{DateTime, FixedOffset, TimeZone};
use questlog_core::db::open_db_in_memory;
use questlog_core::{
    Avatar, AvatarPart, CompletionRecord, CompletionRepository, LeaderboardService,
    LeaderboardWindow, ProfileRepository, ProfileService, ProfileServiceError,
    ProfileValidationError, RepoError, SqliteCompletionRepository, SqliteProfileRepository,
    UserId,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 5, day, hour, 0, 0)
        .unwrap()
}

fn profiles(
    conn: &Connection,
) -> ProfileService<SqliteProfileRepository<'_>, SqliteCompletionRepository<'_>> {
    ProfileService::new(
        SqliteProfileRepository::new(conn),
        SqliteCompletionRepository::new(conn),
    )
}

fn leaderboard(
    conn: &Connection,
) -> LeaderboardService<SqliteProfileRepository<'_>, SqliteCompletionRepository<'_>> {
    LeaderboardService::new(
        SqliteProfileRepository::new(conn),
        SqliteCompletionRepository::new(conn),
    )
}

fn award(conn: &Connection, user: UserId, xp: u32, when: DateTime<FixedOffset>) {
    SqliteCompletionRepository::new(conn)
        .append_completion(&CompletionRecord {
            task_id: Uuid::new_v4(),
            user_id: user,
            xp_awarded: xp,
            completed_at: when.timestamp_millis(),
        })
        .unwrap();
}

#[test]
fn ensure_profile_creates_once_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let service = profiles(&conn);
    let user = Uuid::new_v4();

    let created = service
        .ensure_profile(user, Some("epona@ranch.example"), 42)
        .unwrap();
    assert_eq!(created.display_name, "epona");
    assert_eq!(created.avatar, Avatar::starter());

    let again = service.ensure_profile(user, Some("other@x.example"), 99).unwrap();
    assert_eq!(again, created);

    let anonymous = service.ensure_profile(Uuid::new_v4(), None, 0).unwrap();
    assert_eq!(anonymous.display_name, "Hero");
}

#[test]
fn update_profile_validates_name_and_persists_avatar() {
    let conn = open_db_in_memory().unwrap();
    let service = profiles(&conn);
    let user = Uuid::new_v4();
    service.ensure_profile(user, None, 0).unwrap();

    let err = service
        .update_profile(user, " x ", &Avatar::starter())
        .unwrap_err();
    assert!(matches!(
        err,
        ProfileServiceError::Validation(ProfileValidationError::DisplayNameLength { chars: 1 })
    ));

    let mut avatar = Avatar::starter();
    avatar.set(AvatarPart::Frame, "triforce_1").unwrap();
    let updated = service.update_profile(user, "  Sheik  ", &avatar).unwrap();
    assert_eq!(updated.display_name, "Sheik");
    assert_eq!(updated.avatar.get(AvatarPart::Frame), Some("triforce_1"));

    let mut bogus = Avatar::starter();
    bogus.shield = Some("mirror_9".to_string());
    assert!(matches!(
        service.update_profile(user, "Sheik", &bogus),
        Err(ProfileServiceError::Validation(ProfileValidationError::Avatar(_)))
    ));

    assert!(matches!(
        service.update_profile(Uuid::new_v4(), "Nobody", &Avatar::default()),
        Err(ProfileServiceError::ProfileNotFound(_))
    ));
}

#[test]
fn malformed_avatar_json_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let user = Uuid::new_v4();
    conn.execute(
        "INSERT INTO profiles (id, display_name, avatar_json, created_at)
         VALUES (?1, 'Mido', '{\"hat\":\"cap_1\"}', 0);",
        params![user.to_string()],
    )
    .unwrap();

    let err = SqliteProfileRepository::new(&conn)
        .get_profile(user)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn home_summary_sums_the_whole_ledger() {
    let conn = open_db_in_memory().unwrap();
    let service = profiles(&conn);
    let user = Uuid::new_v4();
    service.ensure_profile(user, Some("saria@forest.example"), 0).unwrap();

    award(&conn, user, 100, at(1, 9));
    award(&conn, user, 35, at(14, 9));
    award(&conn, Uuid::new_v4(), 500, at(14, 9));

    let summary = service.home_summary(user).unwrap();
    assert_eq!(summary.display_name, "saria");
    assert_eq!(summary.total_xp, 135);
    assert_eq!(summary.level.level, 2);
    assert_eq!(summary.level.progress, 35);
    assert_eq!(summary.level.progress_percent(), 28);

    let stranger = service.home_summary(Uuid::new_v4()).unwrap();
    assert_eq!(stranger.display_name, "Hero");
    assert_eq!(stranger.total_xp, 0);
}

#[test]
fn leaderboards_rank_by_window_with_stable_ties() {
    let conn = open_db_in_memory().unwrap();
    let service = profiles(&conn);
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let third = Uuid::new_v4();
    for (user, email) in [(first, "a1@x"), (second, "b2@x"), (third, "c3@x")] {
        service.ensure_profile(user, Some(email), 0).unwrap();
    }

    // 2024-05-13 is a Monday; 2024-05-10 falls in the previous week.
    award(&conn, first, 200, at(10, 9));
    award(&conn, second, 35, at(13, 0));
    award(&conn, third, 35, at(15, 12));

    let now = at(16, 12);
    let weekly = leaderboard(&conn)
        .leaderboard(LeaderboardWindow::Weekly, &now)
        .unwrap();
    let order: Vec<_> = weekly.iter().map(|e| (e.user_id, e.score)).collect();
    assert_eq!(order, vec![(second, 35), (third, 35), (first, 0)]);
    assert!(weekly.iter().all(|e| e.level.is_none()));
    assert_eq!(weekly[2].rank, 3);

    let all_time = leaderboard(&conn)
        .leaderboard(LeaderboardWindow::AllTime, &now)
        .unwrap();
    assert_eq!(all_time[0].user_id, first);
    assert_eq!(all_time[0].score, 200);
    assert_eq!(all_time[0].level, Some(2));
    assert_eq!(all_time[1].user_id, second);
    assert_eq!(all_time[2].level, Some(1));
    assert_eq!(all_time[0].display_name, "a1");
}
