use crate::event::{KeyAction, KeyEvent, TypedStatus};
use crate::mistypes::MistypeTable;
use crate::scorer::{score, SessionStats};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Everything a finished session hands downstream: the stats record for the
/// persistence/display collaborators and the session's mistype table for
/// weak-spot analysis. The event log itself is dropped here.
#[derive(Clone, Debug)]
pub struct SessionReport {
    pub stats: SessionStats,
    pub mistypes: MistypeTable,
}

/// Captures one practice session's keystrokes against a target string and
/// produces the ordered event log the scorer consumes.
///
/// The recorder owns the log exclusively for the session's duration; calling
/// `finish` consumes it, so a scored log can never be appended to again.
#[derive(Clone, Debug)]
pub struct SessionRecorder {
    target: Vec<char>,
    cursor: usize,
    events: Vec<KeyEvent>,
    /// Positions that have ever held a miss.
    missed: HashSet<usize>,
    /// Positions whose miss was later re-typed correctly.
    fixed: HashSet<usize>,
    /// Positions currently holding an uncorrected wrong character.
    wrong_now: HashSet<usize>,
    /// Event-log indices of the Miss presses at each position.
    miss_events: HashMap<usize, Vec<usize>>,
    mistypes: MistypeTable,
    started_at_ms: Option<i64>,
}

impl SessionRecorder {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.chars().collect(),
            cursor: 0,
            events: Vec::new(),
            missed: HashSet::new(),
            fixed: HashSet::new(),
            wrong_now: HashSet::new(),
            miss_events: HashMap::new(),
            mistypes: MistypeTable::new(),
            started_at_ms: None,
        }
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    pub fn mistypes(&self) -> &MistypeTable {
        &self.mistypes
    }

    pub fn has_started(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// The whole target has been typed and nothing on screen is still wrong.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.target.len() && self.wrong_now.is_empty()
    }

    /// Records one character press at wall-clock time.
    pub fn write(&mut self, c: char) {
        self.write_at(c, now_ms());
    }

    /// Records one character press at an explicit capture time.
    pub fn write_at(&mut self, c: char, timestamp_ms: i64) {
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(timestamp_ms);
        }

        let pos = self.cursor;
        let expected = self.target.get(pos).copied();
        let status = match expected {
            Some(e) if e == c => {
                if self.missed.contains(&pos) {
                    self.fixed.insert(pos);
                    TypedStatus::Fixed
                } else {
                    TypedStatus::Hit
                }
            }
            _ => {
                self.missed.insert(pos);
                self.wrong_now.insert(pos);
                self.miss_events
                    .entry(pos)
                    .or_default()
                    .push(self.events.len());
                if let Some(e) = expected {
                    self.mistypes.record(c, e);
                }
                TypedStatus::Miss
            }
        };
        if status != TypedStatus::Miss {
            self.wrong_now.remove(&pos);
        }

        self.events
            .push(KeyEvent::press(c, expected, status, pos, timestamp_ms));
        self.cursor += 1;
    }

    /// Removes one character, at wall-clock time.
    pub fn backspace(&mut self) {
        self.backspace_at(1, now_ms());
    }

    /// Removes up to `count` characters in a single action. A backspace at
    /// the start of the text records nothing.
    pub fn backspace_at(&mut self, count: u32, timestamp_ms: i64) {
        let removed = (count as usize).min(self.cursor);
        if removed == 0 {
            return;
        }
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(timestamp_ms);
        }

        let pos = self.cursor;
        self.cursor -= removed;
        for p in self.cursor..pos {
            self.wrong_now.remove(&p);
        }
        self.events
            .push(KeyEvent::backspace(removed as u32, pos, timestamp_ms));
    }

    /// Deletes the contiguous run of still-wrong characters ending at the
    /// cursor in one action, or a single character if none is wrong.
    pub fn backspace_run_at(&mut self, timestamp_ms: i64) {
        let mut run = 0usize;
        while run < self.cursor && self.wrong_now.contains(&(self.cursor - run - 1)) {
            run += 1;
        }
        self.backspace_at(run.max(1) as u32, timestamp_ms);
    }

    /// Ends the session at wall-clock time and scores it.
    pub fn finish(self) -> SessionReport {
        let end = now_ms();
        self.finish_at(end)
    }

    /// Ends the session at `end_ms` (natural completion or forced end),
    /// retags never-corrected misses as unfixed, and scores the log.
    pub fn finish_at(mut self, end_ms: i64) -> SessionReport {
        for (pos, indices) in &self.miss_events {
            if self.fixed.contains(pos) {
                continue;
            }
            for &i in indices {
                if let KeyAction::Press { ref mut status, .. } = self.events[i].action {
                    *status = TypedStatus::Unfixed;
                }
            }
        }

        let start_ms = self.started_at_ms.unwrap_or(end_ms);
        let stats = score(&self.events, start_ms, end_ms);
        debug!(
            events = self.events.len(),
            wpm = stats.wpm,
            accuracy = stats.accuracy,
            "session finished"
        );

        SessionReport {
            stats,
            mistypes: self.mistypes,
        }
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
