//! SQLite schema definitions.

/// Complete schema for the local database.
pub const SCHEMA: &str = r#"
-- Dictionary terms (replaced wholesale on corpus version change)
CREATE TABLE IF NOT EXISTS terms (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    term TEXT NOT NULL,
    term_en TEXT,
    reading TEXT NOT NULL,
    category TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    short_desc TEXT NOT NULL,
    full_desc TEXT NOT NULL,
    code_example TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    sarcastic_notes TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL
);

-- Per-term learning progress
CREATE TABLE IF NOT EXISTS user_progress (
    term_id TEXT PRIMARY KEY,
    first_learned_at TEXT NOT NULL,
    last_reviewed_at TEXT NOT NULL,
    review_count INTEGER NOT NULL DEFAULT 0,
    quiz_correct INTEGER NOT NULL DEFAULT 0,
    quiz_total INTEGER NOT NULL DEFAULT 0,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    interval_days INTEGER NOT NULL DEFAULT 0,
    next_review TEXT NOT NULL,
    mastery_level INTEGER NOT NULL DEFAULT 0
);

-- Quiz history; the full session is kept as JSON
CREATE TABLE IF NOT EXISTS quiz_sessions (
    id TEXT PRIMARY KEY,
    mode TEXT NOT NULL,
    started_at TEXT NOT NULL,
    completed_at TEXT,
    score_correct INTEGER NOT NULL DEFAULT 0,
    score_total INTEGER NOT NULL DEFAULT 0,
    data TEXT NOT NULL
);

-- Key-value metadata (corpus version)
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_terms_category ON terms(category);
CREATE INDEX IF NOT EXISTS idx_progress_next_review ON user_progress(next_review);
CREATE INDEX IF NOT EXISTS idx_progress_mastery ON user_progress(mastery_level);
CREATE INDEX IF NOT EXISTS idx_sessions_started ON quiz_sessions(started_at);
"#;

/// Metadata key holding the loaded corpus version.
pub const CORPUS_VERSION_KEY: &str = "corpus_version";
