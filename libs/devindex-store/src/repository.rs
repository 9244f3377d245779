//! Repository pattern for database access.

use crate::error::{DbError, Result};
use crate::schema::{CORPUS_VERSION_KEY, SCHEMA};
use chrono::{DateTime, NaiveDate, Utc};
use devindex_core::date_utils::format_date;
use devindex_core::{
    Difficulty, MasteryLevel, Progress, ProgressStore, QuizSession, Term, TermsData,
};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Repository for the term corpus.
pub trait TermRepository {
    /// Insert or replace terms, appending them after the stored ones.
    fn bulk_put_terms(&self, terms: &[Term]) -> Result<usize>;
    fn get_term(&self, id: &str) -> Result<Option<Term>>;
    /// All terms in snapshot order.
    fn get_all_terms(&self) -> Result<Vec<Term>>;
    fn get_terms_by_category(&self, category: &str) -> Result<Vec<Term>>;
    /// Version of the last loaded corpus snapshot.
    fn stored_version(&self) -> Result<Option<String>>;
    /// Replace the stored corpus when the snapshot version differs.
    /// Returns whether a reload happened.
    fn sync_corpus(&self, data: &TermsData) -> Result<bool>;
}

/// Repository for quiz session history.
pub trait SessionRepository {
    fn save_session(&self, session: &QuizSession) -> Result<()>;
    fn get_session(&self, id: &Uuid) -> Result<Option<QuizSession>>;
    /// Most recently started sessions first.
    fn recent_sessions(&self, limit: usize) -> Result<Vec<QuizSession>>;
}

/// Row counts per table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DatabaseStats {
    pub terms_count: usize,
    pub progress_count: usize,
    pub sessions_count: usize,
    pub corpus_version: Option<String>,
}

/// SQLite implementation of repositories.
///
/// The connection is guarded by a mutex, so every statement sequence runs
/// without interleaving and progress upserts are serialized.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open database at path, creating it and its parent directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let repo = Self {
            conn: Mutex::new(Connection::open(path)?),
        };
        repo.initialize()?;
        tracing::info!(path = %path.display(), "database opened");
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let repo = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        repo.initialize()?;
        Ok(repo)
    }

    /// Default on-disk location under the platform's local data directory.
    pub fn default_db_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("devindex")
            .join("devindex.db")
    }

    fn initialize(&self) -> Result<()> {
        self.lock().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a corpus has been loaded.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(count_rows(&self.lock(), "terms")? > 0)
    }

    /// Delete all terms, progress, sessions and the stored corpus version.
    pub fn reset_database(&self) -> Result<()> {
        self.lock().execute_batch(
            "DELETE FROM terms; DELETE FROM user_progress; DELETE FROM quiz_sessions; DELETE FROM meta;",
        )?;
        tracing::info!("database reset");
        Ok(())
    }

    pub fn database_stats(&self) -> Result<DatabaseStats> {
        let conn = self.lock();
        Ok(DatabaseStats {
            terms_count: count_rows(&conn, "terms")?,
            progress_count: count_rows(&conn, "user_progress")?,
            sessions_count: count_rows(&conn, "quiz_sessions")?,
            corpus_version: read_meta(&conn, CORPUS_VERSION_KEY)?,
        })
    }
}

fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(count as usize)
}

fn read_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| row.get(0))
        .optional()
        .map_err(Into::into)
}

fn write_meta(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData(format!("timestamp {value:?}: {e}")))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DbError::InvalidData(format!("date {value:?}: {e}")))
}

// ---- terms ----

const TERM_COLUMNS: &str = "id, term, term_en, reading, category, difficulty, short_desc, \
     full_desc, code_example, tags, sarcastic_notes, created_at";

/// Raw column values; decoded outside the rusqlite row callback.
struct TermRow {
    id: String,
    term: String,
    term_en: Option<String>,
    reading: String,
    category: String,
    difficulty: String,
    short_desc: String,
    full_desc: String,
    code_example: Option<String>,
    tags: String,
    sarcastic_notes: String,
    created_at: String,
}

impl TermRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            term: row.get(1)?,
            term_en: row.get(2)?,
            reading: row.get(3)?,
            category: row.get(4)?,
            difficulty: row.get(5)?,
            short_desc: row.get(6)?,
            full_desc: row.get(7)?,
            code_example: row.get(8)?,
            tags: row.get(9)?,
            sarcastic_notes: row.get(10)?,
            created_at: row.get(11)?,
        })
    }

    fn into_term(self) -> Result<Term> {
        let difficulty = Difficulty::from_str(&self.difficulty)
            .ok_or_else(|| DbError::InvalidData(format!("difficulty {:?}", self.difficulty)))?;
        Ok(Term {
            created_at: parse_timestamp(&self.created_at)?,
            tags: serde_json::from_str(&self.tags)?,
            sarcastic_notes: serde_json::from_str(&self.sarcastic_notes)?,
            id: self.id,
            term: self.term,
            term_en: self.term_en,
            reading: self.reading,
            category: self.category,
            difficulty,
            short_desc: self.short_desc,
            full_desc: self.full_desc,
            code_example: self.code_example,
        })
    }
}

fn query_terms(conn: &Connection, filter: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Term>> {
    let sql = format!("SELECT {TERM_COLUMNS} FROM terms {filter} ORDER BY position");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(args, TermRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(TermRow::into_term).collect()
}

fn insert_terms(conn: &Connection, terms: &[Term]) -> Result<usize> {
    let next_position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM terms",
        [],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "INSERT OR REPLACE INTO terms (position, id, term, term_en, reading, category, difficulty,
             short_desc, full_desc, code_example, tags, sarcastic_notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;
    for (offset, term) in terms.iter().enumerate() {
        stmt.execute(params![
            next_position + offset as i64,
            term.id,
            term.term,
            term.term_en,
            term.reading,
            term.category,
            term.difficulty.as_str(),
            term.short_desc,
            term.full_desc,
            term.code_example,
            serde_json::to_string(&term.tags)?,
            serde_json::to_string(&term.sarcastic_notes)?,
            term.created_at.to_rfc3339(),
        ])?;
    }
    Ok(terms.len())
}

impl TermRepository for SqliteRepository {
    fn bulk_put_terms(&self, terms: &[Term]) -> Result<usize> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let count = insert_terms(&tx, terms)?;
        tx.commit()?;
        Ok(count)
    }

    fn get_term(&self, id: &str) -> Result<Option<Term>> {
        let row = self
            .lock()
            .query_row(
                &format!("SELECT {TERM_COLUMNS} FROM terms WHERE id = ?1"),
                params![id],
                TermRow::from_row,
            )
            .optional()?;
        row.map(TermRow::into_term).transpose()
    }

    fn get_all_terms(&self) -> Result<Vec<Term>> {
        query_terms(&self.lock(), "", &[])
    }

    fn get_terms_by_category(&self, category: &str) -> Result<Vec<Term>> {
        query_terms(&self.lock(), "WHERE category = ?1", &[&category])
    }

    fn stored_version(&self) -> Result<Option<String>> {
        read_meta(&self.lock(), CORPUS_VERSION_KEY)
    }

    fn sync_corpus(&self, data: &TermsData) -> Result<bool> {
        let mut conn = self.lock();
        let stored = read_meta(&conn, CORPUS_VERSION_KEY)?;
        if !data.needs_reload(stored.as_deref()) {
            tracing::debug!(version = %data.version, "corpus up to date");
            return Ok(false);
        }

        let tx = conn.transaction()?;
        tx.execute("DELETE FROM terms", [])?;
        let count = insert_terms(&tx, &data.terms)?;
        write_meta(&tx, CORPUS_VERSION_KEY, &data.version)?;
        tx.commit()?;

        tracing::info!(
            from = stored.as_deref().unwrap_or("none"),
            to = %data.version,
            terms = count,
            "corpus reloaded"
        );
        Ok(true)
    }
}

// ---- progress ----

const PROGRESS_COLUMNS: &str = "term_id, first_learned_at, last_reviewed_at, review_count, \
     quiz_correct, quiz_total, ease_factor, interval_days, next_review, mastery_level";

struct ProgressRow {
    term_id: String,
    first_learned_at: String,
    last_reviewed_at: String,
    review_count: u32,
    quiz_correct: u32,
    quiz_total: u32,
    ease_factor: f64,
    interval: u32,
    next_review: String,
    mastery_level: u8,
}

impl ProgressRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            term_id: row.get(0)?,
            first_learned_at: row.get(1)?,
            last_reviewed_at: row.get(2)?,
            review_count: row.get(3)?,
            quiz_correct: row.get(4)?,
            quiz_total: row.get(5)?,
            ease_factor: row.get(6)?,
            interval: row.get(7)?,
            next_review: row.get(8)?,
            mastery_level: row.get(9)?,
        })
    }

    fn into_progress(self) -> Result<Progress> {
        Ok(Progress {
            first_learned_at: parse_timestamp(&self.first_learned_at)?,
            last_reviewed_at: parse_timestamp(&self.last_reviewed_at)?,
            next_review: parse_date(&self.next_review)?,
            mastery_level: MasteryLevel::try_from(self.mastery_level)?,
            term_id: self.term_id,
            review_count: self.review_count,
            quiz_correct: self.quiz_correct,
            quiz_total: self.quiz_total,
            ease_factor: self.ease_factor,
            interval: self.interval,
        })
    }
}

fn read_progress(conn: &Connection, term_id: &str) -> Result<Option<Progress>> {
    let row = conn
        .query_row(
            &format!("SELECT {PROGRESS_COLUMNS} FROM user_progress WHERE term_id = ?1"),
            params![term_id],
            ProgressRow::from_row,
        )
        .optional()?;
    row.map(ProgressRow::into_progress).transpose()
}

fn write_progress(conn: &Connection, progress: &Progress) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO user_progress ({PROGRESS_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ),
        params![
            progress.term_id,
            progress.first_learned_at.to_rfc3339(),
            progress.last_reviewed_at.to_rfc3339(),
            progress.review_count,
            progress.quiz_correct,
            progress.quiz_total,
            progress.ease_factor,
            progress.interval,
            format_date(progress.next_review),
            progress.mastery_level.to_value(),
        ],
    )?;
    Ok(())
}

impl SqliteRepository {
    fn all_progress(&self) -> Result<Vec<Progress>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM user_progress ORDER BY term_id"
        ))?;
        let rows = stmt
            .query_map([], ProgressRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(ProgressRow::into_progress).collect()
    }

    fn load_progress(&self, records: &[Progress]) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        for progress in records {
            write_progress(&tx, progress)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_progress(
        &self,
        term_id: &str,
        update: &mut dyn FnMut(Option<Progress>) -> Progress,
    ) -> Result<Progress> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let updated = update(read_progress(&tx, term_id)?);
        if updated.term_id != term_id {
            return Err(DbError::InvalidData(format!(
                "upsert for {term_id} produced record for {}",
                updated.term_id
            )));
        }
        write_progress(&tx, &updated)?;
        tx.commit()?;
        Ok(updated)
    }
}

impl ProgressStore for SqliteRepository {
    fn get(&self, term_id: &str) -> devindex_core::Result<Option<Progress>> {
        Ok(read_progress(&self.lock(), term_id)?)
    }

    fn put(&self, progress: &Progress) -> devindex_core::Result<()> {
        Ok(write_progress(&self.lock(), progress)?)
    }

    fn get_all(&self) -> devindex_core::Result<Vec<Progress>> {
        Ok(self.all_progress()?)
    }

    fn bulk_load(&self, records: &[Progress]) -> devindex_core::Result<()> {
        Ok(self.load_progress(records)?)
    }

    fn clear(&self) -> devindex_core::Result<()> {
        self.lock()
            .execute("DELETE FROM user_progress", [])
            .map_err(DbError::from)?;
        Ok(())
    }

    fn upsert(
        &self,
        term_id: &str,
        update: &mut dyn FnMut(Option<Progress>) -> Progress,
    ) -> devindex_core::Result<Progress> {
        Ok(self.upsert_progress(term_id, update)?)
    }
}

// ---- quiz sessions ----

impl SessionRepository for SqliteRepository {
    fn save_session(&self, session: &QuizSession) -> Result<()> {
        self.lock().execute(
            "INSERT OR REPLACE INTO quiz_sessions
                 (id, mode, started_at, completed_at, score_correct, score_total, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id.to_string(),
                session.mode.as_str(),
                session.started_at.to_rfc3339(),
                session.completed_at.map(|t| t.to_rfc3339()),
                session.score.correct as i64,
                session.score.total as i64,
                serde_json::to_string(session)?,
            ],
        )?;
        Ok(())
    }

    fn get_session(&self, id: &Uuid) -> Result<Option<QuizSession>> {
        let data: Option<String> = self
            .lock()
            .query_row(
                "SELECT data FROM quiz_sessions WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|json| serde_json::from_str(&json).map_err(DbError::from))
            .transpose()
    }

    fn recent_sessions(&self, limit: usize) -> Result<Vec<QuizSession>> {
        let conn = self.lock();
        let mut stmt =
            conn.prepare("SELECT data FROM quiz_sessions ORDER BY started_at DESC LIMIT ?1")?;
        let rows = stmt
            .query_map(params![limit as i64], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(DbError::from))
            .collect()
    }
}
