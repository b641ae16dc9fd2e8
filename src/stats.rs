use crate::alphabet::Token;
use crate::app_dirs::AppDirs;
use crate::catch::CatchOutcome;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One resolved catch, as recorded for later analysis.
#[derive(Debug, Clone)]
pub struct CatchRecord {
    /// Lowercase letter of the caught capsule.
    pub letter: char,
    /// Whether the caught capsule was the spoken target.
    pub was_target: bool,
    /// 1-based attempt count on the target at resolution time.
    pub attempt: u32,
    /// "win", "near_miss" or "wrong_grab".
    pub outcome: &'static str,
    pub timestamp: DateTime<Local>,
}

impl CatchRecord {
    pub fn new(caught: Token, target: Token, attempt: u32, outcome: CatchOutcome) -> Self {
        let kind = match outcome {
            CatchOutcome::Win { .. } => "win",
            CatchOutcome::NearMiss => "near_miss",
            CatchOutcome::WrongGrab { .. } => "wrong_grab",
        };
        Self {
            letter: caught.letter(),
            was_target: caught == target,
            attempt,
            outcome: kind,
            timestamp: Local::now(),
        }
    }
}

/// Aggregate per-letter view for the stats screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSummary {
    pub letter: char,
    pub attempts: i64,
    pub wins: i64,
    pub wrong_grabs: i64,
    pub win_rate: f64,
    pub last_caught: Option<DateTime<Local>>,
}

/// Database of resolved catches. Absence (unwritable state dir) degrades
/// silently; callers hold an `Option<CatchStatsDb>`.
#[derive(Debug)]
pub struct CatchStatsDb {
    conn: Connection,
}

impl CatchStatsDb {
    /// Open (and create if needed) the default database.
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("klaw_catches.db"));
        Self::open_at(&db_path)
    }

    /// Open a database at an explicit path. Tests point this at a tempdir.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS catch_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                letter TEXT NOT NULL,
                was_target BOOLEAN NOT NULL,
                attempt INTEGER NOT NULL,
                outcome TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_catch_stats_letter ON catch_stats(letter)",
            [],
        )?;

        Ok(CatchStatsDb { conn })
    }

    pub fn record_catch(&self, rec: &CatchRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO catch_stats (letter, was_target, attempt, outcome, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                rec.letter.to_string(),
                rec.was_target,
                rec.attempt,
                rec.outcome,
                rec.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Per-letter aggregates over every catch on record, letter order.
    pub fn token_summaries(&self) -> Result<Vec<TokenSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT letter,
                   COUNT(*) as attempts,
                   SUM(CASE WHEN outcome = 'win' THEN 1 ELSE 0 END) as wins,
                   SUM(CASE WHEN outcome = 'wrong_grab' THEN 1 ELSE 0 END) as wrong_grabs,
                   MAX(timestamp) as last_caught
            FROM catch_stats
            GROUP BY letter
            ORDER BY letter
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let letter: String = row.get(0)?;
            let attempts: i64 = row.get(1)?;
            let wins: i64 = row.get(2)?;
            let wrong_grabs: i64 = row.get(3)?;
            let last_caught: Option<String> = row.get(4)?;
            Ok((letter, attempts, wins, wrong_grabs, last_caught))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (letter, attempts, wins, wrong_grabs, last_caught) = row?;
            let letter = letter.chars().next().unwrap_or('?');
            let win_rate = if attempts > 0 {
                (wins as f64 / attempts as f64) * 100.0
            } else {
                0.0
            };
            let last_caught = last_caught
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Local));
            summaries.push(TokenSummary {
                letter,
                attempts,
                wins,
                wrong_grabs,
                win_rate,
                last_caught,
            });
        }
        Ok(summaries)
    }

    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM catch_stats", [])?;
        Ok(())
    }
}

/// One finished game, appended to the CSV log.
#[derive(Debug, Clone, Serialize)]
pub struct GameLogEntry {
    pub date: DateTime<Local>,
    pub duration_secs: u32,
    pub score: u32,
    pub rounds_won: u32,
}

/// Append-only CSV log of finished games.
pub struct GameLog;

impl GameLog {
    pub fn append(entry: &GameLogEntry) -> csv::Result<()> {
        let path = AppDirs::game_log_path()
            .unwrap_or_else(|| PathBuf::from("klaw_games.csv"));
        Self::append_at(&path, entry)
    }

    pub fn append_at(path: &Path, entry: &GameLogEntry) -> csv::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Emit the header only when starting a fresh log
        let needs_header = !path.exists();

        let file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(entry)?;
        writer.flush()?;
        Ok(())
    }
}
