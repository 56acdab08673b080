use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

use db::models::academy;
use db::models::event::{EventType, Outcome};
use db::models::player;
use db::models::user;
use db::test_utils::setup_test_db;
use serde_json::json;
use services::attendance::{self, AttendanceMark};
use services::event::{self, CreateEvent, PatchEvent};
use services::metrics;
use services::ServiceError;
use util::schedule::EventStatus;

struct Fixture {
    db: DatabaseConnection,
    academy_id: i64,
    coach_id: i64,
    player_id: i64,
}

async fn fixture() -> Fixture {
    let db = setup_test_db().await;
    let coach = user::Model::create(&db, "coach", "coach@club.test", "secret-pw", false)
        .await
        .expect("create coach");
    let academy = academy::Model::create(&db, "Westside FC", "westside")
        .await
        .expect("create academy");
    let player = player::Model::create(&db, academy.id, "Sam Keeper", Some("U15"), None, Some(1))
        .await
        .expect("create player");
    Fixture {
        db,
        academy_id: academy.id,
        coach_id: coach.id,
        player_id: player.id,
    }
}

fn training(f: &Fixture, date: (i32, u32, u32)) -> CreateEvent {
    CreateEvent {
        academy_id: f.academy_id,
        event_type: EventType::Training,
        title: "Evening drills".into(),
        event_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        start_time: "18:00".into(),
        end_time: "19:30".into(),
        recurring: false,
        weekdays: Vec::new(),
        series_end_date: None,
        parent_id: None,
        opponent: None,
        venue: None,
    }
}

#[tokio::test]
async fn one_off_event_gets_a_computed_status() {
    let f = fixture().await;
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 18, 30, 0).unwrap();

    event::create(&f.db, training(&f, (2024, 1, 5)), f.coach_id, now)
        .await
        .unwrap();
    event::create(&f.db, training(&f, (2024, 1, 12)), f.coach_id, now)
        .await
        .unwrap();

    let listed = event::list(&f.db, f.academy_id, None, now).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].status, Some(EventStatus::Ongoing));
    assert_eq!(listed[1].status, Some(EventStatus::Upcoming));
}

#[tokio::test]
async fn malformed_clock_time_is_rejected_loudly() {
    let f = fixture().await;
    let now = Utc::now();

    let mut bad = training(&f, (2024, 1, 5));
    bad.start_time = "6pm".into();
    let err = event::create(&f.db, bad, f.coach_id, now).await.unwrap_err();
    assert!(matches!(err, ServiceError::Schedule(_)), "got {err:?}");
}

#[tokio::test]
async fn recurring_rule_with_no_matching_dates_is_rejected() {
    let f = fixture().await;
    let now = Utc::now();

    let mut rule = training(&f, (2024, 1, 1));
    rule.recurring = true;
    rule.series_end_date = NaiveDate::from_ymd_opt(2024, 1, 2); // Mon..Tue
    rule.weekdays = vec!["friday".into()];
    let err = event::create(&f.db, rule, f.coach_id, now).await.unwrap_err();
    assert!(matches!(err, ServiceError::EmptyRecurrence));
}

#[tokio::test]
async fn occurrences_merge_persisted_rows_with_expansion() {
    let f = fixture().await;
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

    let mut rule = training(&f, (2024, 1, 1));
    rule.recurring = true;
    rule.series_end_date = NaiveDate::from_ymd_opt(2024, 1, 14);
    rule.weekdays = vec!["monday".into(), "wednesday".into()];
    let parent = event::create(&f.db, rule, f.coach_id, now).await.unwrap();

    // Materialize the second Monday so it can hold attendance.
    let mut occurrence = training(&f, (2024, 1, 8));
    occurrence.parent_id = Some(parent.id);
    let persisted = event::create(&f.db, occurrence, f.coach_id, now)
        .await
        .unwrap();
    assert_eq!(persisted.parent_id, Some(parent.id));

    let occ = event::occurrences(&f.db, parent.id, f.academy_id, now)
        .await
        .unwrap();
    let dates: Vec<String> = occ.iter().map(|o| o.event_date.to_string()).collect();
    assert_eq!(
        dates,
        vec!["2024-01-01", "2024-01-03", "2024-01-08", "2024-01-10"]
    );
    // The materialized date keeps its row id; the rest are synthetic.
    assert!(occ[2].id.is_some());
    assert!(occ[0].id.is_none() && occ[1].id.is_none() && occ[3].id.is_none());
    assert!(occ.iter().all(|o| o.occurrence_key.is_some()));
}

#[tokio::test]
async fn occurrence_off_the_weekday_grid_is_rejected() {
    let f = fixture().await;
    let now = Utc::now();

    let mut rule = training(&f, (2024, 1, 1));
    rule.recurring = true;
    rule.series_end_date = NaiveDate::from_ymd_opt(2024, 1, 14);
    rule.weekdays = vec!["monday".into()];
    let parent = event::create(&f.db, rule, f.coach_id, now).await.unwrap();

    // 2024-01-02 is a Tuesday.
    let mut off_grid = training(&f, (2024, 1, 2));
    off_grid.parent_id = Some(parent.id);
    let err = event::create(&f.db, off_grid, f.coach_id, now)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn occurrences_of_a_missing_parent_are_an_orphan_error() {
    let f = fixture().await;
    let err = event::occurrences(&f.db, 9999, f.academy_id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::OrphanOccurrence));
}

#[tokio::test]
async fn scores_derive_the_outcome_server_side() {
    let f = fixture().await;
    let now = Utc.with_ymd_and_hms(2024, 2, 3, 17, 0, 0).unwrap();

    let mut fixture_match = training(&f, (2024, 2, 3));
    fixture_match.event_type = EventType::Match;
    fixture_match.opponent = Some("Eastside United".into());
    let created = event::create(&f.db, fixture_match, f.coach_id, now)
        .await
        .unwrap();

    let patched = event::patch(
        &f.db,
        created.id,
        f.coach_id,
        PatchEvent {
            goals_for: Some(2),
            goals_against: Some(1),
            ..Default::default()
        },
        now,
    )
    .await
    .unwrap();
    assert_eq!(patched.outcome, Some(Outcome::Win));

    // A later correction re-derives instead of trusting the old value.
    let corrected = event::patch(
        &f.db,
        created.id,
        f.coach_id,
        PatchEvent {
            goals_against: Some(2),
            ..Default::default()
        },
        now,
    )
    .await
    .unwrap();
    assert_eq!(corrected.outcome, Some(Outcome::Draw));
}

#[tokio::test]
async fn attendance_map_fans_out_and_unmarks() {
    let f = fixture().await;
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 18, 0, 0).unwrap();
    let created = event::create(&f.db, training(&f, (2024, 1, 5)), f.coach_id, now)
        .await
        .unwrap();

    let mark = |m| {
        let mut map = HashMap::new();
        map.insert(f.player_id, m);
        PatchEvent {
            attendance: Some(map),
            ..Default::default()
        }
    };

    event::patch(&f.db, created.id, f.coach_id, mark(AttendanceMark::Present), now)
        .await
        .unwrap();
    let records = attendance::for_event(&f.db, created.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[&f.player_id].marked_by, f.coach_id);

    event::patch(&f.db, created.id, f.coach_id, mark(AttendanceMark::Unmarked), now)
        .await
        .unwrap();
    let records = attendance::for_event(&f.db, created.id).await.unwrap();
    assert!(records.is_empty(), "unmarked removes the row");
}

#[tokio::test]
async fn attendance_for_an_unknown_player_is_rejected() {
    let f = fixture().await;
    let now = Utc::now();
    let created = event::create(&f.db, training(&f, (2024, 1, 5)), f.coach_id, now)
        .await
        .unwrap();

    let mut map = HashMap::new();
    map.insert(424242, AttendanceMark::Present);
    let err = event::patch(
        &f.db,
        created.id,
        f.coach_id,
        PatchEvent {
            attendance: Some(map),
            ..Default::default()
        },
        now,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn patched_occurrence_stays_on_the_rule_grid() {
    let f = fixture().await;
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

    let mut rule = training(&f, (2024, 1, 1));
    rule.recurring = true;
    rule.series_end_date = NaiveDate::from_ymd_opt(2024, 1, 15);
    rule.weekdays = vec!["monday".into()];
    let parent = event::create(&f.db, rule, f.coach_id, now).await.unwrap();

    let mut occurrence = training(&f, (2024, 1, 8));
    occurrence.parent_id = Some(parent.id);
    let occ = event::create(&f.db, occurrence, f.coach_id, now)
        .await
        .unwrap();

    let move_to = |d: (i32, u32, u32)| PatchEvent {
        event_date: NaiveDate::from_ymd_opt(d.0, d.1, d.2),
        ..Default::default()
    };

    // Off the weekday grid: a Tuesday.
    let err = event::patch(&f.db, occ.id, f.coach_id, move_to((2024, 1, 9)), now)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");

    // On the grid, but past the series end.
    let err = event::patch(&f.db, occ.id, f.coach_id, move_to((2024, 1, 22)), now)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");

    // Another Monday inside the range is a legal move.
    let moved = event::patch(&f.db, occ.id, f.coach_id, move_to((2024, 1, 15)), now)
        .await
        .unwrap();
    assert_eq!(
        moved.event_date,
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    );
}

#[tokio::test]
async fn metrics_map_replaces_each_players_document() {
    let f = fixture().await;
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 18, 0, 0).unwrap();
    let created = event::create(&f.db, training(&f, (2024, 1, 5)), f.coach_id, now)
        .await
        .unwrap();

    let doc = |v: serde_json::Value| {
        let mut map = HashMap::new();
        map.insert(f.player_id, v);
        PatchEvent {
            metrics: Some(map),
            ..Default::default()
        }
    };

    event::patch(
        &f.db,
        created.id,
        f.coach_id,
        doc(json!({ "distance_km": 5.2, "sprints": 9 })),
        now,
    )
    .await
    .unwrap();
    let stored = metrics::for_event(&f.db, created.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[&f.player_id].metrics["sprints"], 9);

    // A later patch replaces the document wholesale, it does not merge.
    event::patch(
        &f.db,
        created.id,
        f.coach_id,
        doc(json!({ "distance_km": 6.0 })),
        now,
    )
    .await
    .unwrap();
    let stored = metrics::for_event(&f.db, created.id).await.unwrap();
    assert_eq!(stored[&f.player_id].metrics["distance_km"], 6.0);
    assert!(stored[&f.player_id].metrics.get("sprints").is_none());
}

#[tokio::test]
async fn metrics_for_an_unknown_player_are_rejected() {
    let f = fixture().await;
    let now = Utc::now();
    let created = event::create(&f.db, training(&f, (2024, 1, 5)), f.coach_id, now)
        .await
        .unwrap();

    let mut map = HashMap::new();
    map.insert(424242, json!({ "distance_km": 1.0 }));
    let err = event::patch(
        &f.db,
        created.id,
        f.coach_id,
        PatchEvent {
            metrics: Some(map),
            ..Default::default()
        },
        now,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn deleting_a_rule_removes_its_occurrences() {
    let f = fixture().await;
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

    let mut rule = training(&f, (2024, 1, 1));
    rule.recurring = true;
    rule.series_end_date = NaiveDate::from_ymd_opt(2024, 1, 14);
    rule.weekdays = vec!["monday".into()];
    let parent = event::create(&f.db, rule, f.coach_id, now).await.unwrap();

    let mut occurrence = training(&f, (2024, 1, 8));
    occurrence.parent_id = Some(parent.id);
    event::create(&f.db, occurrence, f.coach_id, now)
        .await
        .unwrap();

    event::delete(&f.db, parent.id, f.academy_id).await.unwrap();
    let listed = event::list(&f.db, f.academy_id, None, now).await.unwrap();
    assert!(listed.is_empty());
}
