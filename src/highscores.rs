//! High score table and name entry
//!
//! Persisted as a JSON list of `{name, score}`, kept sorted by score
//! (descending). Name entry is driven by a small set of gamepad actions, each
//! rate limited while held.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::NAME_ENTRY_KEY_COOLDOWN_MS;
use crate::error::{Error, Result};
use crate::sim::cooldown::Cooldown;
use crate::sim::events::GameObserver;

/// Characters selectable during name entry, in cycling order
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÜ ";

/// Number of rows shown by the leaderboard
pub const SHOWN_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from unsorted entries
    pub fn from_entries(mut entries: Vec<HighScoreEntry>) -> Self {
        // Stable: equal scores keep their recorded order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Best `n` entries
    pub fn top(&self, n: usize) -> &[HighScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Get the rank a score would achieve (1-indexed)
    pub fn potential_rank(&self, score: u32) -> usize {
        self.entries.iter().take_while(|e| e.score >= score).count() + 1
    }

    /// Record a score; returns the rank achieved (1-indexed)
    pub fn append(&mut self, name: impl Into<String>, score: u32) -> usize {
        let rank = self.potential_rank(score);
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                name: name.into(),
                score,
            },
        );
        rank
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the table from a JSON file; a missing file is an empty table
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No high scores found, starting fresh");
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = serde_json::from_str(&json).map_err(|source| Error::Json {
            context: path.display().to_string(),
            source,
        })?;
        let scores = Self::from_entries(entries);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).map_err(|source| Error::Json {
            context: "high scores".to_string(),
            source,
        })?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Ordinal label of a 1-indexed rank ("1ST", "2ND", ...)
pub fn ordinal(rank: usize) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (1, r) if r != 11 => "ST",
        (2, r) if r != 12 => "ND",
        (3, r) if r != 13 => "RD",
        _ => "TH",
    };
    format!("{rank}{suffix}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntryMode {
    #[default]
    Invisible,
    EnteringName,
    ListingNames,
}

/// Name entry actions held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameKeys {
    pub next_char: bool,
    pub prev_char: bool,
    pub remove: bool,
    pub next_digit: bool,
    pub done: bool,
}

/// Per-action repeat gates
#[derive(Debug, Clone)]
struct KeyRepeat {
    next_char: Cooldown,
    prev_char: Cooldown,
    remove: Cooldown,
    next_digit: Cooldown,
    done: Cooldown,
}

impl Default for KeyRepeat {
    fn default() -> Self {
        let gate = Cooldown::new(NAME_ENTRY_KEY_COOLDOWN_MS);
        Self {
            next_char: gate,
            prev_char: gate,
            remove: gate,
            next_digit: gate,
            done: gate,
        }
    }
}

impl KeyRepeat {
    /// Actions that fire this tick; released keys may fire again at once
    fn filter(&mut self, time: f64, held: &NameKeys) -> NameKeys {
        fn gate(cooldown: &mut Cooldown, time: f64, pressed: bool) -> bool {
            if !pressed {
                cooldown.reset();
                return false;
            }
            cooldown.try_trigger(time)
        }
        NameKeys {
            next_char: gate(&mut self.next_char, time, held.next_char),
            prev_char: gate(&mut self.prev_char, time, held.prev_char),
            remove: gate(&mut self.remove, time, held.remove),
            next_digit: gate(&mut self.next_digit, time, held.next_digit),
            done: gate(&mut self.done, time, held.done),
        }
    }
}

/// End-of-game name entry
#[derive(Debug, Clone, Default)]
pub struct NameEntry {
    mode: EntryMode,
    score: u32,
    name: String,
    char_index: usize,
    keys: KeyRepeat,
}

impl NameEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Start entering a name for `score`; ignored unless invisible
    pub fn handle_end_of_game(&mut self, score: u32) {
        if self.mode == EntryMode::Invisible {
            self.score = score;
            self.mode = EntryMode::EnteringName;
        }
    }

    pub fn handle_reset(&mut self) {
        self.mode = EntryMode::Invisible;
    }

    /// Character currently under the cursor
    pub fn current_char(&self) -> char {
        ALPHABET.chars().nth(self.char_index).unwrap_or(' ')
    }

    /// Text of the entry line ("AB" + cursor char + "_"), empty when not entering
    pub fn display_text(&self) -> String {
        if self.mode != EntryMode::EnteringName {
            return String::new();
        }
        format!("{}{}_", self.name, self.current_char())
    }

    /// Apply held actions; returns the rank when a name was submitted
    pub fn update(&mut self, time: f64, held: &NameKeys, table: &mut HighScores) -> Option<usize> {
        if self.mode != EntryMode::EnteringName {
            return None;
        }
        let keys = self.keys.filter(time, held);
        let len = ALPHABET.chars().count();
        if keys.next_char {
            self.char_index = (self.char_index + 1) % len;
        } else if keys.prev_char {
            self.char_index = self.char_index.checked_sub(1).unwrap_or(len - 1);
        } else if keys.remove {
            self.name.pop();
            self.char_index = 0;
        } else if keys.next_digit {
            self.name.push(self.current_char());
            self.char_index = 0;
        } else if keys.done {
            self.name.push(self.current_char());
            let name = std::mem::take(&mut self.name);
            let rank = table.append(name, self.score);
            self.char_index = 0;
            self.mode = EntryMode::ListingNames;
            return Some(rank);
        }
        None
    }
}

impl GameObserver for NameEntry {
    fn on_score_entry_reset(&mut self) {
        self.handle_reset();
    }

    fn on_end_of_game(&mut self, score: u32) {
        self.handle_end_of_game(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(scores: &[(&str, u32)]) -> HighScores {
        HighScores::from_entries(
            scores
                .iter()
                .map(|(name, score)| HighScoreEntry {
                    name: name.to_string(),
                    score: *score,
                })
                .collect(),
        )
    }

    fn press(f: impl FnOnce(&mut NameKeys)) -> NameKeys {
        let mut keys = NameKeys::default();
        f(&mut keys);
        keys
    }

    #[test]
    fn test_entries_sorted_descending() {
        let t = table(&[("BOB", 10), ("ANN", 80), ("CY", 40)]);
        let scores: Vec<u32> = t.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![80, 40, 10]);
        assert_eq!(t.top_score(), Some(80));
        assert_eq!(t.top(2).len(), 2);
        assert_eq!(t.top(9).len(), 3);
    }

    #[test]
    fn test_append_returns_rank() {
        let mut t = table(&[("ANN", 80), ("CY", 40)]);
        assert_eq!(t.potential_rank(50), 2);
        assert_eq!(t.append("DAN", 50), 2);
        assert_eq!(t.append("EVE", 40), 4);
        assert_eq!(t.append("FAY", 100), 1);
        assert_eq!(t.entries()[3].name, "CY");
        assert_eq!(HighScores::new().potential_rank(0), 1);
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "1ST");
        assert_eq!(ordinal(2), "2ND");
        assert_eq!(ordinal(3), "3RD");
        assert_eq!(ordinal(4), "4TH");
        assert_eq!(ordinal(11), "11TH");
        assert_eq!(ordinal(22), "22ND");
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("tile-quest-{}-hs.json", std::process::id()));
        let t = table(&[("ÄRNE", 30), ("BO", 60)]);
        t.save(&path).expect("save");
        let loaded = HighScores::load(&path).expect("load");
        assert_eq!(loaded, t);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = std::env::temp_dir().join("tile-quest-no-such-highscores.json");
        assert!(HighScores::load(&path).expect("load").is_empty());
    }

    #[test]
    fn test_end_of_game_only_from_invisible() {
        let mut entry = NameEntry::new();
        assert_eq!(entry.display_text(), "");
        entry.handle_end_of_game(120);
        assert_eq!(entry.mode(), EntryMode::EnteringName);
        entry.handle_end_of_game(999);
        assert_eq!(entry.score(), 120);
        assert_eq!(entry.display_text(), "A_");
        entry.handle_reset();
        assert_eq!(entry.mode(), EntryMode::Invisible);
    }

    #[test]
    fn test_entering_a_name() {
        let mut entry = NameEntry::new();
        let mut t = table(&[("ANN", 80)]);
        entry.handle_end_of_game(90);
        let none = NameKeys::default();

        entry.update(0.0, &press(|k| k.next_char = true), &mut t);
        entry.update(10.0, &none, &mut t);
        entry.update(20.0, &press(|k| k.next_char = true), &mut t);
        assert_eq!(entry.display_text(), "C_");
        entry.update(30.0, &press(|k| k.next_digit = true), &mut t);
        entry.update(40.0, &none, &mut t);
        entry.update(50.0, &press(|k| k.prev_char = true), &mut t);
        assert_eq!(entry.display_text(), "C _");
        entry.update(60.0, &none, &mut t);
        entry.update(70.0, &press(|k| k.prev_char = true), &mut t);
        assert_eq!(entry.current_char(), 'Ü');

        let rank = entry.update(80.0, &press(|k| k.done = true), &mut t);
        assert_eq!(rank, Some(1));
        assert_eq!(entry.mode(), EntryMode::ListingNames);
        assert_eq!(t.entries()[0].name, "CÜ");
        assert_eq!(t.entries()[0].score, 90);
        assert_eq!(entry.display_text(), "");
    }

    #[test]
    fn test_held_key_repeats_every_cooldown() {
        let mut entry = NameEntry::new();
        let mut t = HighScores::new();
        entry.handle_end_of_game(5);
        let hold = press(|k| k.next_char = true);
        let mut time = 0.0;
        while time < 300.0 {
            entry.update(time, &hold, &mut t);
            time += 10.0;
        }
        // Fires at 0 and 150
        assert_eq!(entry.current_char(), 'C');
    }

    #[test]
    fn test_remove_drops_last_char() {
        let mut entry = NameEntry::new();
        let mut t = HighScores::new();
        entry.handle_end_of_game(5);
        entry.update(0.0, &press(|k| k.next_digit = true), &mut t);
        entry.update(10.0, &press(|k| k.remove = true), &mut t);
        assert_eq!(entry.display_text(), "A_");
        entry.update(20.0, &NameKeys::default(), &mut t);
        entry.update(30.0, &press(|k| k.remove = true), &mut t);
        assert_eq!(entry.display_text(), "A_");
    }

    #[test]
    fn test_observer_drives_mode() {
        use crate::sim::events::{GameEvent, dispatch};
        let mut entry = NameEntry::new();
        dispatch(&[GameEvent::EndOfGame { score: 33 }], &mut entry);
        assert_eq!(entry.mode(), EntryMode::EnteringName);
        dispatch(&[GameEvent::ScoreEntryReset], &mut entry);
        assert_eq!(entry.mode(), EntryMode::Invisible);
    }
}
