use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::QaStorage;
use crate::error::QaError;
use crate::middleware::{DbTx, Role, WriteTx, current_user, require};
use crate::router::QaState;
use crate::templates::{AnswerTemplate, AskTemplate, UnansweredTemplate, render};

pub const EMPTY_QUESTION: &str = "Please write a question";
pub const UNKNOWN_EXPERT: &str = "Please pick an expert from the list";

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
    pub expert: i64,
}

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub answer: String,
}

/// GET /ask -> question form listing the experts.
pub async fn ask_page(jar: PrivateCookieJar, DbTx(mut tx): DbTx) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = require(current_user(&jar, &mut store).await?, Role::Member)?;
    let experts = store.list_experts().await?;
    tx.commit().await?;

    render(AskTemplate {
        viewer: Some(viewer),
        experts,
        error: None,
    })
}

/// POST /ask -> store a question from the viewer to the chosen user.
pub async fn ask_submit(
    jar: PrivateCookieJar,
    WriteTx(mut tx): WriteTx,
    Form(form): Form<AskForm>,
) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = require(current_user(&jar, &mut store).await?, Role::Member)?;

    let question_text = form.question.trim();
    let error = if question_text.is_empty() {
        Some(EMPTY_QUESTION)
    } else if store.user_by_id(form.expert).await?.is_none() {
        Some(UNKNOWN_EXPERT)
    } else {
        None
    };
    if let Some(error) = error {
        let experts = store.list_experts().await?;
        return render(AskTemplate {
            viewer: Some(viewer),
            experts,
            error: Some(error.to_string()),
        });
    }

    let question_id = store.ask(question_text, viewer.id, form.expert).await?;
    tx.commit().await?;

    info!(
        question_id,
        asked_by = viewer.id,
        expert_id = form.expert,
        "question asked"
    );
    Ok(Redirect::to("/").into_response())
}

/// GET /answer/{id} -> answer form for an unanswered question.
pub async fn answer_page(
    State(state): State<QaState>,
    Path(id): Path<i64>,
    jar: PrivateCookieJar,
    DbTx(mut tx): DbTx,
) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = require(current_user(&jar, &mut store).await?, Role::Expert)?;
    let target = store.answer_target(id).await?.ok_or(QaError::NotFound)?;
    tx.commit().await?;

    if !state.answer_policy.permits(&viewer, &target) {
        return Err(QaError::Forbidden);
    }
    if target.is_answered() {
        return Ok(Redirect::to(&format!("/question/{id}")).into_response());
    }

    render(AnswerTemplate {
        viewer: Some(viewer),
        question_id: target.id,
        question_text: target.question_text,
    })
}

/// POST /answer/{id} -> record the answer, back to the unanswered queue.
pub async fn answer_submit(
    State(state): State<QaState>,
    Path(id): Path<i64>,
    jar: PrivateCookieJar,
    WriteTx(mut tx): WriteTx,
    Form(form): Form<AnswerForm>,
) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = require(current_user(&jar, &mut store).await?, Role::Expert)?;
    let target = store.answer_target(id).await?.ok_or(QaError::NotFound)?;

    if !state.answer_policy.permits(&viewer, &target) {
        warn!(
            question_id = id,
            user_id = viewer.id,
            expert_id = target.expert_id,
            "answer rejected: question addressed to another expert"
        );
        return Err(QaError::Forbidden);
    }

    let answer = form.answer.trim();
    if answer.is_empty() {
        return Ok(Redirect::to(&format!("/answer/{id}")).into_response());
    }
    if !store.record_answer(id, answer).await? {
        return Ok(Redirect::to(&format!("/question/{id}")).into_response());
    }
    tx.commit().await?;

    info!(question_id = id, user_id = viewer.id, "answer recorded");
    Ok(Redirect::to("/unanswered").into_response())
}

/// GET /unanswered -> the viewer's queue.
pub async fn unanswered(jar: PrivateCookieJar, DbTx(mut tx): DbTx) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = require(current_user(&jar, &mut store).await?, Role::Expert)?;
    let questions = store.unanswered_for(viewer.id).await?;
    tx.commit().await?;

    render(UnansweredTemplate {
        viewer: Some(viewer),
        questions,
    })
}
