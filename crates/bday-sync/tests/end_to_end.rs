//! End-to-end runs against a Baïkal-shaped SQLite file.

use std::{path::PathBuf, time::Duration};

use bday_core::change::ChangeOperation;
use bday_core::store::CalendarStore;
use bday_store_sqlite::{SCHEMA, SqliteStore};
use bday_sync::{SyncConfig, SyncOutcome, run};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;
use tempfile::TempDir;

struct Fixture {
  _dir: TempDir,
  path: PathBuf,
}

impl Fixture {
  fn new() -> Self {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("db.sqlite");
    let conn = Connection::open(&path).expect("create db");
    conn.execute_batch(SCHEMA).expect("schema");
    conn
      .execute("INSERT INTO principals (uri) VALUES ('principals/jane')", [])
      .expect("principal");
    Self { _dir: dir, path }
  }

  fn conn(&self) -> Connection {
    Connection::open(&self.path).expect("open db")
  }

  fn put_card(&self, uri: &str, props: &str) {
    let data = format!("BEGIN:VCARD\r\nVERSION:3.0\r\n{props}END:VCARD\r\n");
    let conn = self.conn();
    conn
      .execute("DELETE FROM cards WHERE uri = ?1", [uri])
      .expect("delete card");
    conn
      .execute(
        "INSERT INTO cards (addressbookid, uri, carddata) VALUES (1, ?1, ?2)",
        [uri, data.as_str()],
      )
      .expect("insert card");
  }

  fn remove_card(&self, uri: &str) {
    self
      .conn()
      .execute("DELETE FROM cards WHERE uri = ?1", [uri])
      .expect("delete card");
  }

  async fn sync(&self, now: DateTime<Utc>) -> SyncOutcome {
    let config = SyncConfig {
      store_path: self.path.clone(),
      ..SyncConfig::default()
    };
    let store = SqliteStore::open(&self.path, Duration::from_secs(5))
      .await
      .expect("open store");
    let outcome = run(&store, &config, now).await.expect("sync");
    store.close().await.expect("close");
    outcome
  }

  /// `(uri, synctoken, operation)` rows of the change log, oldest first.
  fn change_log(&self) -> Vec<(String, i64, i64)> {
    let conn = self.conn();
    let mut stmt = conn
      .prepare("SELECT uri, synctoken, operation FROM calendarchanges ORDER BY id")
      .expect("prepare");
    stmt
      .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
      .expect("query")
      .collect::<rusqlite::Result<Vec<_>>>()
      .expect("rows")
  }

  fn sync_token(&self) -> i64 {
    self
      .conn()
      .query_row("SELECT synctoken FROM calendars", [], |r| r.get(0))
      .expect("token")
  }

  fn events(&self) -> Vec<(String, String, String)> {
    let conn = self.conn();
    let mut stmt = conn
      .prepare("SELECT uri, uid, calendardata FROM calendarobjects ORDER BY uri")
      .expect("prepare");
    stmt
      .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
      .expect("query")
      .collect::<rusqlite::Result<Vec<_>>>()
      .expect("rows")
  }
}

fn at(day: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, day, 8, 0, 0).unwrap()
}

#[tokio::test]
async fn single_contact_creates_one_event() {
  let fx = Fixture::new();
  fx.put_card("jane.vcf", "FN:Jane Doe\r\nBDAY:1990-07-04\r\n");

  let outcome = fx.sync(at(1)).await;
  assert_eq!(outcome.principal, "principals/jane");
  assert!(outcome.calendar.created);
  assert_eq!(outcome.report.created, 1);
  assert_eq!(outcome.report.processed(), 1);

  let events = fx.events();
  assert_eq!(events.len(), 1);
  let (uri, uid, data) = &events[0];
  assert_eq!(uri, &format!("{uid}.ics"));
  assert_eq!(uid, &bday_ical::make_uid("jane.vcf"));
  assert!(data.contains("SUMMARY:Jane Doe's Birthday\r\n"));
  assert!(data.contains("DTSTART;VALUE=DATE:19900704\r\n"));
  assert!(data.contains("DTEND;VALUE=DATE:19900705\r\n"));
  assert!(data.contains("RRULE:FREQ=YEARLY\r\n"));

  assert_eq!(fx.sync_token(), 2);
  assert_eq!(
    fx.change_log(),
    vec![(uri.clone(), 2, ChangeOperation::Created.code())]
  );

  let registered: String = fx
    .conn()
    .query_row(
      "SELECT displayname FROM calendarinstances
       WHERE uri = 'birthdays' AND principaluri = 'principals/jane'",
      [],
      |r| r.get(0),
    )
    .expect("calendar instance");
  assert_eq!(registered, "Birthdays");
}

#[tokio::test]
async fn second_run_changes_nothing() {
  let fx = Fixture::new();
  fx.put_card("jane.vcf", "FN:Jane Doe\r\nBDAY:1990-07-04\r\n");
  fx.put_card("john.vcf", "N:Smith;John;;;\r\nBDAY:--03-09\r\n");

  fx.sync(at(1)).await;
  let token = fx.sync_token();
  let log_len = fx.change_log().len();

  let outcome = fx.sync(at(2)).await;
  assert!(!outcome.calendar.created);
  assert_eq!(outcome.report.unchanged, 2);
  assert_eq!(outcome.report.updated, 0);
  assert_eq!(outcome.report.deleted, 0);
  assert_eq!(fx.sync_token(), token);
  assert_eq!(fx.change_log().len(), log_len);
}

#[tokio::test]
async fn changed_birthday_updates_in_place() {
  let fx = Fixture::new();
  fx.put_card("jane.vcf", "FN:Jane Doe\r\nBDAY:1990-07-04\r\n");
  fx.sync(at(1)).await;
  let (uri, uid, _) = fx.events().remove(0);

  fx.put_card("jane.vcf", "FN:Jane Doe\r\nBDAY:19900705\r\n");
  let outcome = fx.sync(at(2)).await;
  assert_eq!(outcome.report.updated, 1);
  assert_eq!(fx.sync_token(), 3);

  let log = fx.change_log();
  assert_eq!(log.len(), 2);
  assert_eq!(log[1], (uri.clone(), 3, ChangeOperation::Updated.code()));

  let events = fx.events();
  assert_eq!(events.len(), 1);
  assert_eq!((&events[0].0, &events[0].1), (&uri, &uid));
  assert!(events[0].2.contains("DTSTART;VALUE=DATE:19900705\r\n"));

  let first: i64 = fx
    .conn()
    .query_row("SELECT firstoccurence FROM calendarobjects", [], |r| r.get(0))
    .expect("firstoccurence");
  assert_eq!(first, Utc.with_ymd_and_hms(1990, 7, 5, 0, 0, 0).unwrap().timestamp());
}

#[tokio::test]
async fn removed_birthday_deletes_event() {
  let fx = Fixture::new();
  fx.put_card("jane.vcf", "FN:Jane Doe\r\nBDAY:1990-07-04\r\n");
  fx.put_card("john.vcf", "FN:John\r\nBDAY:1985-04-15\r\n");
  fx.sync(at(1)).await;
  let john_uri = format!("{}.ics", bday_ical::make_uid("john.vcf"));

  fx.put_card("john.vcf", "FN:John\r\n");
  let outcome = fx.sync(at(2)).await;
  assert_eq!(outcome.report.deleted, 1);
  assert_eq!(outcome.report.processed(), 1);

  let log = fx.change_log();
  assert_eq!(log.last(), Some(&(john_uri.clone(), 4, ChangeOperation::Deleted.code())));
  assert!(fx.events().iter().all(|(uri, _, _)| uri != &john_uri));

  // Last birthday gone: the container is emptied, not left with orphans.
  fx.remove_card("jane.vcf");
  let outcome = fx.sync(at(3)).await;
  assert_eq!(outcome.candidates, 0);
  assert_eq!(outcome.report.deleted, 1);
  assert!(fx.events().is_empty());
  assert_eq!(fx.sync_token(), 5);
}

#[tokio::test]
async fn store_api_matches_raw_change_log() {
  let fx = Fixture::new();
  fx.put_card("jane.vcf", "FN:Jane Doe\r\nBDAY:1990-07-04\r\n");
  let outcome = fx.sync(at(1)).await;

  let store = SqliteStore::open(&fx.path, Duration::from_secs(5))
    .await
    .expect("open store");
  let changes = store
    .changes_since(outcome.calendar.id, 0)
    .await
    .expect("changes");
  assert_eq!(changes.len(), 1);
  assert_eq!(changes[0].operation, ChangeOperation::Created);
  assert_eq!(store.sync_token(outcome.calendar.id).await.expect("token"), 2);
}

#[tokio::test]
async fn missing_store_file_fails_to_open() {
  let dir = tempfile::tempdir().expect("tempdir");
  let path = dir.path().join("absent.sqlite");
  assert!(SqliteStore::open(&path, Duration::from_secs(1)).await.is_err());
  assert!(!path.exists());
}
