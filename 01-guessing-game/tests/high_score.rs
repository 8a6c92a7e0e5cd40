use std::fs;

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use guessing_game::models::{GameError, HighScoreRecord};
use guessing_game::repository::{record_if_best, FileHighScoreStore, HighScoreStore, HIGH_SCORE_FILE};

#[test]
fn missing_file_loads_none_then_round_trips() {
    let dir = tempdir().unwrap();
    let store = FileHighScoreStore::in_dir(dir.path().join("Data"));
    assert_eq!(store.load().unwrap(), None);

    let at = Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap() + chrono::Duration::milliseconds(250);
    store.save(5, at).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, HighScoreRecord::new(5, at));
}

#[test]
fn save_creates_data_directory_and_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("nested").join("Data");
    let store = FileHighScoreStore::in_dir(&data_dir);
    store.save(3, Utc::now()).unwrap();

    let entries: Vec<_> = fs::read_dir(&data_dir).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(entries, vec![std::ffi::OsString::from(HIGH_SCORE_FILE)]);
    let text = fs::read_to_string(data_dir.join(HIGH_SCORE_FILE)).unwrap();
    assert!(text.contains("\"Score\": 3"));
    assert!(text.contains("\"DateAchieved\""));
}

#[test]
fn reads_record_written_by_hand() {
    let dir = tempdir().unwrap();
    let store = FileHighScoreStore::in_dir(dir.path());
    fs::write(store.path(), r#"{ "Score": 4, "DateAchieved": "2025-04-01T12:00:00+02:00" }"#).unwrap();
    let record = store.load().unwrap().unwrap();
    assert_eq!(record.score, 4);
    assert_eq!(record.achieved_at, Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap());
}

#[test]
fn truncated_file_is_reported_as_corrupt() {
    let dir = tempdir().unwrap();
    let store = FileHighScoreStore::in_dir(dir.path());
    store.save(8, Utc::now()).unwrap();
    let text = fs::read_to_string(store.path()).unwrap();
    fs::write(store.path(), &text[..text.len() / 2]).unwrap();

    assert!(matches!(store.load(), Err(GameError::CorruptData(_))));
}

#[test]
fn wrong_field_names_are_corrupt() {
    let dir = tempdir().unwrap();
    let store = FileHighScoreStore::in_dir(dir.path());
    fs::write(store.path(), r#"{ "score": 4, "achievedAt": "2025-04-01T12:00:00Z" }"#).unwrap();
    assert!(matches!(store.load(), Err(GameError::CorruptData(_))));
}

#[test]
fn only_strictly_better_wins_overwrite() {
    let dir = tempdir().unwrap();
    let store = FileHighScoreStore::in_dir(dir.path());
    let first = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    store.save(7, first).unwrap();

    let later = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    let update = record_if_best(&store, 5, later).unwrap();
    assert!(update.is_new_record);
    assert_eq!(update.previous, Some(HighScoreRecord::new(7, first)));
    assert_eq!(store.load().unwrap(), Some(HighScoreRecord::new(5, later)));

    let latest = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let update = record_if_best(&store, 9, latest).unwrap();
    assert!(!update.is_new_record);
    assert_eq!(store.load().unwrap(), Some(HighScoreRecord::new(5, later)));
}

#[test]
fn failed_replace_cleans_up_temp_file() {
    let dir = tempdir().unwrap();
    let store = FileHighScoreStore::in_dir(dir.path());
    // A directory where the record should be makes the final rename fail.
    fs::create_dir(store.path()).unwrap();

    assert!(matches!(store.save(2, Utc::now()), Err(GameError::Persistence(_))));

    let mut entries: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
    entries.sort();
    assert_eq!(entries, vec![std::ffi::OsString::from(HIGH_SCORE_FILE)]);
}
