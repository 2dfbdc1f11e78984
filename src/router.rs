use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::config::AnswerPolicy;
use crate::db::DbPool;
use crate::handlers::{account, admin, pages, questions};
use crate::middleware::SessionSettings;

#[derive(Clone)]
pub struct QaState {
    pub pool: DbPool,
    pub answer_policy: AnswerPolicy,
    pub session: SessionSettings,
    key: Key,
}

impl QaState {
    pub fn new(
        pool: DbPool,
        key: Key,
        answer_policy: AnswerPolicy,
        session: SessionSettings,
    ) -> Self {
        Self {
            pool,
            answer_policy,
            session,
            key,
        }
    }
}

impl FromRef<QaState> for Key {
    fn from_ref(state: &QaState) -> Self {
        state.key.clone()
    }
}

pub fn qa_router(state: QaState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/question/{id}", get(pages::question))
        .route(
            "/register",
            get(account::register_page).post(account::register_submit),
        )
        .route("/login", get(account::login_page).post(account::login_submit))
        .route("/logout", get(account::logout))
        .route("/ask", get(questions::ask_page).post(questions::ask_submit))
        .route(
            "/answer/{id}",
            get(questions::answer_page).post(questions::answer_submit),
        )
        .route("/unanswered", get(questions::unanswered))
        .route("/users", get(admin::users))
        .route("/promote/{id}", get(admin::promote))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
