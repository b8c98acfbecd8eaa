use crate::event::{KeyAction, KeyEvent, TypedStatus};
use crate::util::percent;
use serde::{Deserialize, Serialize};

/// One "word" is five characters, the standard typing-speed convention.
pub const AVERAGE_WORD_LENGTH: u32 = 5;

/// Aggregate result of one completed (or force-ended) practice session.
///
/// Serializes to the field names and units the statistics API expects:
/// millisecond timestamps, integer-second duration, percentages as 0-100
/// floats with one decimal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub start_time: i64,
    pub end_time: i64,
    /// Whole seconds between start and end.
    pub practice_duration: i64,
    /// Gross words per minute over all scored keystrokes.
    pub wpm: u32,
    /// Gross WPM scaled by accuracy.
    pub net_wpm: u32,
    pub accuracy: f64,
    /// Accuracy with every backspace counted as an extra attempt.
    pub raw_accuracy: f64,
    pub corrected_char_count: u32,
    pub error_char_count: u32,
    pub deleted_char_count: u32,
    pub correct_chars_typed: u32,
    pub total_chars_typed: u32,
}

/// Scores an ordered event log against the session window.
///
/// Pure and total: a degenerate window (`end_ms <= start_ms`) clamps elapsed
/// time to 1 ms instead of failing, and every ratio guards its denominator.
pub fn score(events: &[KeyEvent], start_ms: i64, end_ms: i64) -> SessionStats {
    let mut hits: u32 = 0;
    let mut misses: u32 = 0;
    let mut fixed: u32 = 0;
    let mut unfixed: u32 = 0;
    let mut deletes: u32 = 0;

    for event in events {
        match event.action {
            KeyAction::Backspace { delete_count } => deletes += delete_count.max(1),
            KeyAction::Press { status, .. } => match status {
                TypedStatus::Hit => hits += 1,
                TypedStatus::Miss => misses += 1,
                TypedStatus::Fixed => fixed += 1,
                TypedStatus::Unfixed => unfixed += 1,
            },
        }
    }

    // A character only counts as corrected if a deletion actually revised it;
    // extra FIXED marks or stray backspaces cannot inflate the count.
    let corrected = fixed.min(deletes);
    let final_correct = hits + corrected;
    let attempts = hits + misses + unfixed + corrected;

    let accuracy = percent(final_correct, attempts, 1);
    let raw_accuracy = percent(final_correct, attempts + deletes, 1);

    let elapsed_ms = (end_ms - start_ms).max(1);
    let minutes = elapsed_ms as f64 / 60_000.0;
    let wpm = ((attempts as f64 / AVERAGE_WORD_LENGTH as f64) / minutes).floor() as u32;
    let net_wpm = (wpm as f64 * accuracy / 100.0).floor() as u32;

    SessionStats {
        start_time: start_ms,
        end_time: end_ms,
        practice_duration: (end_ms - start_ms).max(0) / 1000,
        wpm,
        net_wpm,
        accuracy,
        raw_accuracy,
        corrected_char_count: corrected,
        error_char_count: unfixed + misses.saturating_sub(corrected),
        deleted_char_count: deletes,
        correct_chars_typed: final_correct,
        total_chars_typed: attempts + deletes,
    }
}
