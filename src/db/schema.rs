//! SQL DDL for the users/questions store.
//!
//! - `users.name` is UNIQUE and is the login key
//! - `questions.answer_text` NULL means unanswered
//! - partial index backs the per-expert unanswered queue

#[cfg(feature = "sqlite")]
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    expert BOOLEAN NOT NULL DEFAULT 0,
    admin BOOLEAN NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_text TEXT NOT NULL,
    answer_text TEXT NULL,
    asked_by_id INTEGER NOT NULL REFERENCES users(id),
    expert_id INTEGER NOT NULL REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_questions_unanswered
    ON questions(expert_id) WHERE answer_text IS NULL;
"#;

#[cfg(feature = "postgres")]
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    expert BOOLEAN NOT NULL DEFAULT FALSE,
    admin BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE TABLE IF NOT EXISTS questions (
    id BIGSERIAL PRIMARY KEY,
    question_text TEXT NOT NULL,
    answer_text TEXT NULL,
    asked_by_id BIGINT NOT NULL REFERENCES users(id),
    expert_id BIGINT NOT NULL REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_questions_unanswered
    ON questions(expert_id) WHERE answer_text IS NULL;
"#;
