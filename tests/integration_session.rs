use assert_matches::assert_matches;
use chrono::Local;
use keyscore::history::SessionLog;
use keyscore::store::MistypeDb;
use keyscore::{KeyAction, SessionRecorder, TypedStatus};
use tempfile::tempdir;

#[test]
fn full_session_flow_to_store_and_log() {
    // Type "hello" with one corrected slip on the second character.
    let mut rec = SessionRecorder::new("hello");
    rec.write_at('h', 0);
    rec.write_at('w', 120);
    rec.backspace_at(1, 240);
    rec.write_at('e', 360);
    rec.write_at('l', 480);
    rec.write_at('l', 600);
    rec.write_at('o', 720);
    assert!(rec.is_complete());

    let report = rec.finish_at(10_000);

    // hits=4, miss=1, corrected=1 -> 5 correct of 6 attempts
    assert_eq!(report.stats.correct_chars_typed, 5);
    assert_eq!(report.stats.accuracy, 83.3);
    assert_eq!(report.stats.corrected_char_count, 1);
    assert_eq!(report.stats.deleted_char_count, 1);
    assert_eq!(report.stats.error_char_count, 0);
    assert_eq!(report.stats.practice_duration, 10);

    // Session mistypes land in the cross-session store.
    let mut db = MistypeDb::in_memory().unwrap();
    db.record_table(&report.mistypes, Local::now()).unwrap();
    assert_eq!(db.confusions_for('e').unwrap(), vec![('w', 1)]);
    assert_eq!(db.total_misses('e').unwrap(), 1);

    // And the result row lands in the CSV log.
    let dir = tempdir().unwrap();
    let log = SessionLog::with_path(dir.path().join("log.csv"));
    log.append(&report.stats).unwrap();
    let contents = std::fs::read_to_string(log.path()).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn forced_end_scores_partial_log() {
    // Session aborted mid-target: the shorter log scores with an artificial
    // end time, and the dangling miss surfaces as an error char.
    let mut rec = SessionRecorder::new("abcdef");
    rec.write_at('a', 0);
    rec.write_at('x', 100);
    assert!(!rec.is_complete());

    let report = rec.finish_at(2_500);

    assert_eq!(report.stats.total_chars_typed, 2);
    assert_eq!(report.stats.error_char_count, 1);
    assert_eq!(report.stats.accuracy, 50.0);
    assert_eq!(report.stats.practice_duration, 2);
}

#[test]
fn event_log_shape_matches_capture_order() {
    let mut rec = SessionRecorder::new("ab");
    rec.write_at('a', 0);
    rec.write_at('z', 50);
    rec.backspace_at(1, 100);
    rec.write_at('b', 150);

    let events = rec.events().to_vec();
    assert_eq!(events.len(), 4);
    assert!(events.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));

    assert_matches!(
        events[0].action,
        KeyAction::Press {
            status: TypedStatus::Hit,
            ..
        }
    );
    assert_matches!(events[2].action, KeyAction::Backspace { delete_count: 1 });
    assert_matches!(
        events[3].action,
        KeyAction::Press {
            status: TypedStatus::Fixed,
            ..
        }
    );
}

#[test]
fn store_accumulates_across_sessions() {
    let mut db = MistypeDb::in_memory().unwrap();

    for _ in 0..3 {
        let mut rec = SessionRecorder::new("on");
        rec.write_at('o', 0);
        rec.write_at('m', 50);
        rec.backspace_at(1, 100);
        rec.write_at('n', 150);
        let report = rec.finish_at(1_000);
        db.record_table(&report.mistypes, Local::now()).unwrap();
    }

    assert_eq!(db.total_misses('n').unwrap(), 3);
    assert_eq!(db.summary().unwrap(), vec![('n', 3, 1)]);
}
