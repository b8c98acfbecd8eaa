use crate::error::Result;
use crate::scorer::SessionStats;
use chrono::Local;
use directories::ProjectDirs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const HEADER: [&str; 13] = [
    "date",
    "start_ms",
    "end_ms",
    "duration_secs",
    "wpm",
    "net_wpm",
    "accuracy",
    "raw_accuracy",
    "corrected",
    "errors",
    "deleted",
    "correct_typed",
    "total_typed",
];

/// Append-only CSV log of completed session results.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "keyscore") {
            pd.config_dir().join("log.csv")
        } else {
            PathBuf::from("keyscore_log.csv")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one result row, emitting the header when the file is new.
    pub fn append(&self, stats: &SessionStats) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(HEADER)?;
        }
        writer.write_record([
            Local::now().format("%c").to_string(),
            stats.start_time.to_string(),
            stats.end_time.to_string(),
            stats.practice_duration.to_string(),
            stats.wpm.to_string(),
            stats.net_wpm.to_string(),
            format!("{:.1}", stats.accuracy),
            format!("{:.1}", stats.raw_accuracy),
            stats.corrected_char_count.to_string(),
            stats.error_char_count.to_string(),
            stats.deleted_char_count.to_string(),
            stats.correct_chars_typed.to_string(),
            stats.total_chars_typed.to_string(),
        ])?;
        writer.flush()?;

        Ok(())
    }
}
