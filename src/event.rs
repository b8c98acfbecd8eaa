use serde::{Deserialize, Serialize};

/// How a single press was scored against the target at capture time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedStatus {
    /// Matched the expected character on first attempt.
    Hit,
    /// Did not match the expected character.
    Miss,
    /// Re-typed correctly after a backspace over an earlier miss.
    Fixed,
    /// Missed and never corrected before the session ended.
    Unfixed,
}

/// One observed input action: a character press or a backspace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum KeyAction {
    Press {
        /// The character actually produced.
        key: char,
        /// What the target required at the cursor; None past the end.
        expected: Option<char>,
        status: TypedStatus,
    },
    Backspace {
        /// Characters removed in one action (delete-whole-run support).
        delete_count: u32,
    },
}

/// One entry in a session's append-only event log.
///
/// Logs are in non-decreasing timestamp order, owned by a single session,
/// and dropped once scoring has run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub action: KeyAction,
    /// Zero-based position in the target the action applied to.
    pub cursor_index: usize,
    /// Monotonic capture time, milliseconds.
    pub timestamp_ms: i64,
}

impl KeyEvent {
    pub fn press(
        key: char,
        expected: Option<char>,
        status: TypedStatus,
        cursor_index: usize,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            action: KeyAction::Press {
                key,
                expected,
                status,
            },
            cursor_index,
            timestamp_ms,
        }
    }

    pub fn backspace(delete_count: u32, cursor_index: usize, timestamp_ms: i64) -> Self {
        Self {
            action: KeyAction::Backspace { delete_count },
            cursor_index,
            timestamp_ms,
        }
    }

    pub fn is_backspace(&self) -> bool {
        matches!(self.action, KeyAction::Backspace { .. })
    }
}
