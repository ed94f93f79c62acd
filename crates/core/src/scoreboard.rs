//! Scoreboard: username/score records in CSV form.
//!
//! The core only needs `record` and `best`; reading and writing the backing
//! file belongs to the caller. A malformed row fails the whole parse, with
//! no partial recovery.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreboardError {
    #[error("malformed scoreboard row at line {line}: '{row}'")]
    MalformedRow { line: usize, row: String },
}

#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    rows: Vec<(String, u32)>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `username,score` CSV rows. Blank lines are skipped.
    pub fn from_csv_str(text: &str) -> Result<Self, ScoreboardError> {
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parsed = line.rsplit_once(',').and_then(|(name, score)| {
                score
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .map(|s| (name.trim().to_string(), s))
            });
            match parsed {
                Some(row) => rows.push(row),
                None => {
                    return Err(ScoreboardError::MalformedRow {
                        line: idx + 1,
                        row: line.to_string(),
                    })
                }
            }
        }
        Ok(Self { rows })
    }

    pub fn record(&mut self, username: &str, score: u32) {
        self.rows.push((username.to_string(), score));
    }

    /// Highest recorded score, if any.
    pub fn best(&self) -> Option<(&str, u32)> {
        self.rows
            .iter()
            .max_by_key(|(_, score)| *score)
            .map(|(name, score)| (name.as_str(), *score))
    }

    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        for (name, score) in &self.rows {
            out.push_str(name);
            out.push(',');
            out.push_str(&score.to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_tracks_the_highest_score() {
        let mut board = Scoreboard::new();
        assert_eq!(board.best(), None);
        board.record("ada", 120);
        board.record("vic", 450);
        board.record("ada", 300);
        assert_eq!(board.best(), Some(("vic", 450)));
    }

    #[test]
    fn csv_round_trip() {
        let mut board = Scoreboard::new();
        board.record("ada", 10);
        board.record("vic", 20);
        let text = board.to_csv_string();
        let parsed = Scoreboard::from_csv_str(&text).unwrap();
        assert_eq!(parsed.best(), Some(("vic", 20)));
    }

    #[test]
    fn malformed_row_fails_whole_parse() {
        let err = Scoreboard::from_csv_str("ada,10\nbroken\n").unwrap_err();
        assert_eq!(
            err,
            ScoreboardError::MalformedRow {
                line: 2,
                row: "broken".to_string()
            }
        );
    }
}
