use crate::db::models::{
    AnswerTarget, ExpertChoice, NewUser, PendingQuestion, PublicQuestion, QuestionDetail, User,
    UserSummary,
};
use crate::db::{DbConnection, queries};
use crate::error::QaError;

/// Typed access to `users` and `questions` over a single connection.
///
/// Callers hand in the connection behind the request's transaction, so every
/// statement issued through one `QaStorage` commits or rolls back together.
pub struct QaStorage<'c> {
    conn: &'c mut DbConnection,
}

impl<'c> QaStorage<'c> {
    pub fn new(conn: &'c mut DbConnection) -> Self {
        Self { conn }
    }

    pub async fn user_by_id(&mut self, id: i64) -> Result<Option<User>, QaError> {
        let user = sqlx::query_as::<_, User>(queries::SELECT_USER_BY_ID)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(user)
    }

    pub async fn user_by_name(&mut self, name: &str) -> Result<Option<User>, QaError> {
        let user = sqlx::query_as::<_, User>(queries::SELECT_USER_BY_NAME)
            .bind(name)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(user)
    }

    /// Insert a user and return the generated id.
    /// A taken name surfaces as a unique violation (see `QaError::is_unique_violation`).
    pub async fn create_user(&mut self, user: NewUser<'_>) -> Result<i64, QaError> {
        let id: i64 = sqlx::query_scalar(queries::INSERT_USER)
            .bind(user.name)
            .bind(user.password_hash)
            .bind(user.expert)
            .bind(user.admin)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(id)
    }

    pub async fn list_users(&mut self) -> Result<Vec<UserSummary>, QaError> {
        let users = sqlx::query_as::<_, UserSummary>(queries::SELECT_USERS)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(users)
    }

    pub async fn list_experts(&mut self) -> Result<Vec<ExpertChoice>, QaError> {
        let experts = sqlx::query_as::<_, ExpertChoice>(queries::SELECT_EXPERTS)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(experts)
    }

    /// Flag the user as expert. Returns false when no user has that id.
    pub async fn promote(&mut self, id: i64) -> Result<bool, QaError> {
        let res = sqlx::query(queries::PROMOTE_USER)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn grant_admin(&mut self, id: i64) -> Result<bool, QaError> {
        let res = sqlx::query(queries::GRANT_ADMIN)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Insert a question from `asked_by_id` addressed to `expert_id`; returns its id.
    pub async fn ask(
        &mut self,
        question_text: &str,
        asked_by_id: i64,
        expert_id: i64,
    ) -> Result<i64, QaError> {
        let id: i64 = sqlx::query_scalar(queries::INSERT_QUESTION)
            .bind(question_text)
            .bind(asked_by_id)
            .bind(expert_id)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(id)
    }

    pub async fn answered_questions(&mut self) -> Result<Vec<PublicQuestion>, QaError> {
        let questions = sqlx::query_as::<_, PublicQuestion>(queries::SELECT_ANSWERED_QUESTIONS)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(questions)
    }

    pub async fn question_detail(&mut self, id: i64) -> Result<Option<QuestionDetail>, QaError> {
        let question = sqlx::query_as::<_, QuestionDetail>(queries::SELECT_QUESTION_DETAIL)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(question)
    }

    pub async fn answer_target(&mut self, id: i64) -> Result<Option<AnswerTarget>, QaError> {
        let target = sqlx::query_as::<_, AnswerTarget>(queries::SELECT_ANSWER_TARGET)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(target)
    }

    /// Set the answer if the question is still unanswered.
    /// Returns false when the question is missing or already answered.
    pub async fn record_answer(&mut self, id: i64, answer_text: &str) -> Result<bool, QaError> {
        let res = sqlx::query(queries::RECORD_ANSWER)
            .bind(answer_text)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn unanswered_for(&mut self, expert_id: i64) -> Result<Vec<PendingQuestion>, QaError> {
        let questions = sqlx::query_as::<_, PendingQuestion>(queries::SELECT_UNANSWERED_FOR_EXPERT)
            .bind(expert_id)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(questions)
    }
}
