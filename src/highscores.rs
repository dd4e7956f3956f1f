//! High score leaderboard
//!
//! Longest survival times, best first. Persisted as a small text file with
//! one `seconds<TAB>name` record per line.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::clock::format_time;
use crate::consts::MAX_HIGH_SCORES;
use crate::persistence::{PersistError, write_with_backup};

/// Name stored when the player leaves the name box empty
pub const ANONYMOUS: &str = "???";

/// Errors loading or saving the leaderboard
#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("Reading {path:?} failed : {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Bad high score on line {line} : {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq)]
pub struct HighScoreEntry {
    /// Survival time in seconds
    pub seconds: f64,
    pub name: String,
}

/// High score leaderboard
#[derive(Debug, Clone, Default)]
pub struct HighScores {
    /// Sorted descending by time, at most `MAX_HIGH_SCORES` long
    pub entries: Vec<HighScoreEntry>,
    /// Backing file; `None` keeps the scores in memory only
    path: Option<PathBuf>,
}

impl HighScores {
    /// Create an empty in-memory leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            path: None,
        }
    }

    /// Load the leaderboard backed by `path`
    ///
    /// A missing file is an empty leaderboard; an empty file is created so
    /// that later rewrites always have something to back up.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high scores at {path:?}, starting fresh");
                fs::write(&path, "").map_err(|source| LedgerError::Io {
                    path: path.clone(),
                    source,
                })?;
                String::new()
            }
            Err(source) => return Err(LedgerError::Io { path, source }),
        };

        let mut entries = parse(&text)?;
        sort_and_trim(&mut entries);
        log::info!("Loaded {} high scores from {path:?}", entries.len());
        Ok(Self {
            entries,
            path: Some(path),
        })
    }

    /// Check if a time makes it onto the leaderboard
    pub fn qualifies(&self, seconds: f64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Has to beat the current last place
        self.entries
            .get(MAX_HIGH_SCORES - 1)
            .map(|e| seconds > e.seconds)
            .unwrap_or(true)
    }

    /// Get the rank a time would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, seconds: f64) -> Option<usize> {
        if !self.qualifies(seconds) {
            return None;
        }
        let rank = self.entries.iter().position(|e| seconds > e.seconds);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new time to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, seconds: f64, name: &str) -> Option<usize> {
        let rank = self.potential_rank(seconds)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                seconds,
                name: clean_name(name),
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Offer a finished round's time to the leaderboard
    ///
    /// Asks `ask_name` only when the time qualifies. Returns false if the time
    /// didn't qualify or the player cancelled. A failed save is logged; the
    /// file keeps its old contents and the new entry stays in memory.
    pub fn record<F>(&mut self, seconds: f64, ask_name: F) -> bool
    where
        F: FnOnce() -> Option<String>,
    {
        if !self.qualifies(seconds) {
            log::info!("{} doesn't make the high scores", format_time(seconds));
            return false;
        }

        let Some(name) = ask_name() else {
            log::info!("High score entry cancelled");
            return false;
        };

        let Some(rank) = self.add_score(seconds, &name) else {
            return false;
        };
        log::info!("New high score #{rank}: {}", format_time(seconds));

        if let Err(e) = self.save() {
            log::warn!("Saving high scores failed: {e}");
        }
        true
    }

    /// Rewrite the backing file (no-op for in-memory leaderboards)
    pub fn save(&self) -> Result<(), LedgerError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_with_backup(path, &self.to_text())?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Best entries first, at most `MAX_HIGH_SCORES`
    pub fn top(&self) -> &[HighScoreEntry] {
        &self.entries[..self.entries.len().min(MAX_HIGH_SCORES)]
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File contents for the current entries
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            let _ = writeln!(text, "{:.4}\t{}", entry.seconds, entry.name);
        }
        text
    }

    /// Text for the high score message box
    pub fn listing(&self) -> String {
        if self.entries.is_empty() {
            return "There are no high scores yet.".to_string();
        }
        self.top()
            .iter()
            .map(|e| format!("{}\t{}", format_time(e.seconds), e.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse ledger text; blank lines are skipped, anything else malformed fails
pub fn parse(text: &str) -> Result<Vec<HighScoreEntry>, LedgerError> {
    let mut entries = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (seconds, name) = line.split_once('\t').ok_or_else(|| LedgerError::Parse {
            line: i + 1,
            reason: "missing tab".to_string(),
        })?;
        let seconds = seconds
            .trim()
            .parse::<f64>()
            .map_err(|e| LedgerError::Parse {
                line: i + 1,
                reason: format!("{seconds:?}: {e}"),
            })?;
        entries.push(HighScoreEntry {
            seconds,
            name: name.to_string(),
        });
    }
    Ok(entries)
}

/// One line of the file per entry: control characters (tabs and newlines
/// included) become spaces, blank names become `ANONYMOUS`
fn clean_name(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    match name.trim() {
        "" => ANONYMOUS.to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn sort_and_trim(entries: &mut Vec<HighScoreEntry>) {
    entries.sort_by(|a, b| b.seconds.total_cmp(&a.seconds));
    entries.truncate(MAX_HIGH_SCORES);
}
