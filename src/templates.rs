//! Askama templates for the Q&A pages.
//!
//! Every page carries `viewer`, the resolved current user, for the nav bar.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::db::{ExpertChoice, PendingQuestion, PublicQuestion, QuestionDetail, User, UserSummary};
use crate::error::QaError;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub viewer: Option<User>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub viewer: Option<User>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub viewer: Option<User>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "question.html")]
pub struct QuestionTemplate {
    pub viewer: Option<User>,
    pub question: QuestionDetail,
}

#[derive(Template)]
#[template(path = "answer.html")]
pub struct AnswerTemplate {
    pub viewer: Option<User>,
    pub question_id: i64,
    pub question_text: String,
}

#[derive(Template)]
#[template(path = "ask.html")]
pub struct AskTemplate {
    pub viewer: Option<User>,
    pub experts: Vec<ExpertChoice>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "unanswered.html")]
pub struct UnansweredTemplate {
    pub viewer: Option<User>,
    pub questions: Vec<PendingQuestion>,
}

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub viewer: Option<User>,
    pub users: Vec<UserSummary>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate;

/// Render a page as an HTML response.
pub fn render<T: Template>(template: T) -> Result<Response, QaError> {
    Ok(Html(template.render()?).into_response())
}
