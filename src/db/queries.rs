//! Parameterized statements for the selected backend.
//!
//! SQLite binds with `?`, PostgreSQL with `$1, $2, ...`. Both dialects expose
//! the same constant names so `QaStorage` stays backend-agnostic.

pub use dialect::*;

#[cfg(feature = "sqlite")]
mod dialect {
    pub const SELECT_USER_BY_ID: &str =
        "SELECT id, name, password, expert, admin FROM users WHERE id = ?";

    pub const SELECT_USER_BY_NAME: &str =
        "SELECT id, name, password, expert, admin FROM users WHERE name = ?";

    pub const INSERT_USER: &str =
        "INSERT INTO users (name, password, expert, admin) VALUES (?, ?, ?, ?) RETURNING id";

    pub const PROMOTE_USER: &str = "UPDATE users SET expert = TRUE WHERE id = ?";

    pub const GRANT_ADMIN: &str = "UPDATE users SET admin = TRUE WHERE id = ?";

    pub const INSERT_QUESTION: &str = r#"
        INSERT INTO questions (question_text, asked_by_id, expert_id)
        VALUES (?, ?, ?)
        RETURNING id
    "#;

    pub const SELECT_QUESTION_DETAIL: &str = r#"
        SELECT questions.id AS id,
               questions.question_text AS question_text,
               questions.answer_text AS answer_text,
               askers.name AS asker_name,
               experts.name AS expert_name
        FROM questions
        JOIN users AS askers ON askers.id = questions.asked_by_id
        JOIN users AS experts ON experts.id = questions.expert_id
        WHERE questions.id = ?
    "#;

    pub const SELECT_ANSWER_TARGET: &str =
        "SELECT id, question_text, answer_text, expert_id FROM questions WHERE id = ?";

    pub const RECORD_ANSWER: &str =
        "UPDATE questions SET answer_text = ? WHERE id = ? AND answer_text IS NULL";

    pub const SELECT_UNANSWERED_FOR_EXPERT: &str = r#"
        SELECT questions.id AS id,
               questions.question_text AS question_text,
               users.name AS asker_name
        FROM questions
        JOIN users ON users.id = questions.asked_by_id
        WHERE questions.answer_text IS NULL AND questions.expert_id = ?
        ORDER BY questions.id
    "#;
}

#[cfg(feature = "postgres")]
mod dialect {
    pub const SELECT_USER_BY_ID: &str =
        "SELECT id, name, password, expert, admin FROM users WHERE id = $1";

    pub const SELECT_USER_BY_NAME: &str =
        "SELECT id, name, password, expert, admin FROM users WHERE name = $1";

    pub const INSERT_USER: &str =
        "INSERT INTO users (name, password, expert, admin) VALUES ($1, $2, $3, $4) RETURNING id";

    pub const PROMOTE_USER: &str = "UPDATE users SET expert = TRUE WHERE id = $1";

    pub const GRANT_ADMIN: &str = "UPDATE users SET admin = TRUE WHERE id = $1";

    pub const INSERT_QUESTION: &str = r#"
        INSERT INTO questions (question_text, asked_by_id, expert_id)
        VALUES ($1, $2, $3)
        RETURNING id
    "#;

    pub const SELECT_QUESTION_DETAIL: &str = r#"
        SELECT questions.id AS id,
               questions.question_text AS question_text,
               questions.answer_text AS answer_text,
               askers.name AS asker_name,
               experts.name AS expert_name
        FROM questions
        JOIN users AS askers ON askers.id = questions.asked_by_id
        JOIN users AS experts ON experts.id = questions.expert_id
        WHERE questions.id = $1
    "#;

    pub const SELECT_ANSWER_TARGET: &str =
        "SELECT id, question_text, answer_text, expert_id FROM questions WHERE id = $1";

    pub const RECORD_ANSWER: &str =
        "UPDATE questions SET answer_text = $1 WHERE id = $2 AND answer_text IS NULL";

    pub const SELECT_UNANSWERED_FOR_EXPERT: &str = r#"
        SELECT questions.id AS id,
               questions.question_text AS question_text,
               users.name AS asker_name
        FROM questions
        JOIN users ON users.id = questions.asked_by_id
        WHERE questions.answer_text IS NULL AND questions.expert_id = $1
        ORDER BY questions.id
    "#;
}

// Parameterless statements are shared by both dialects.

pub const SELECT_USERS: &str = "SELECT id, name, expert, admin FROM users ORDER BY id";

pub const SELECT_EXPERTS: &str = "SELECT id, name FROM users WHERE expert = TRUE ORDER BY name";

pub const SELECT_ANSWERED_QUESTIONS: &str = r#"
    SELECT questions.id AS question_id,
           questions.question_text AS question_text,
           askers.name AS asker_name,
           experts.name AS expert_name
    FROM questions
    JOIN users AS askers ON askers.id = questions.asked_by_id
    JOIN users AS experts ON experts.id = questions.expert_id
    WHERE questions.answer_text IS NOT NULL
    ORDER BY questions.id
"#;
