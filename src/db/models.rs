use sqlx::FromRow;

#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Argon2 PHC string, never the plaintext.
    pub password: String,
    pub expert: bool,
    pub admin: bool,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("expert", &self.expert)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

/// Insert payload for `users`.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub password_hash: &'a str,
    pub expert: bool,
    pub admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub expert: bool,
    pub admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExpertChoice {
    pub id: i64,
    pub name: String,
}

/// An answered question as listed on the home feed.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PublicQuestion {
    pub question_id: i64,
    pub question_text: String,
    pub asker_name: String,
    pub expert_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct QuestionDetail {
    pub id: i64,
    pub question_text: String,
    pub answer_text: Option<String>,
    pub asker_name: String,
    pub expert_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AnswerTarget {
    pub id: i64,
    pub question_text: String,
    pub answer_text: Option<String>,
    pub expert_id: i64,
}

impl AnswerTarget {
    pub fn is_answered(&self) -> bool {
        self.answer_text.is_some()
    }
}

/// A question waiting in an expert's unanswered queue.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PendingQuestion {
    pub id: i64,
    pub question_text: String,
    pub asker_name: String,
}
