use axum::extract::Path;
use axum::response::Response;
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::db::QaStorage;
use crate::error::QaError;
use crate::middleware::{DbTx, current_user};
use crate::templates::{HomeTemplate, QuestionTemplate, render};

/// GET / -> every answered question.
pub async fn home(jar: PrivateCookieJar, DbTx(mut tx): DbTx) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = current_user(&jar, &mut store).await?;
    let questions = store.answered_questions().await?;
    tx.commit().await?;

    render(HomeTemplate { viewer, questions })
}

/// GET /question/{id} -> one question with its answer, 404 when missing.
pub async fn question(
    Path(id): Path<i64>,
    jar: PrivateCookieJar,
    DbTx(mut tx): DbTx,
) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = current_user(&jar, &mut store).await?;
    let question = store.question_detail(id).await?.ok_or(QaError::NotFound)?;
    tx.commit().await?;

    render(QuestionTemplate { viewer, question })
}
