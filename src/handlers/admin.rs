use axum::{
    extract::Path,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::info;

use crate::db::QaStorage;
use crate::error::QaError;
use crate::middleware::{DbTx, Role, WriteTx, current_user, require};
use crate::templates::{UsersTemplate, render};

/// GET /users -> every user with role flags.
pub async fn users(jar: PrivateCookieJar, DbTx(mut tx): DbTx) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = require(current_user(&jar, &mut store).await?, Role::Admin)?;
    let users = store.list_users().await?;
    tx.commit().await?;

    render(UsersTemplate {
        viewer: Some(viewer),
        users,
    })
}

/// GET /promote/{id} -> flag the user as expert.
pub async fn promote(
    Path(id): Path<i64>,
    jar: PrivateCookieJar,
    WriteTx(mut tx): WriteTx,
) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = require(current_user(&jar, &mut store).await?, Role::Admin)?;
    let promoted = store.promote(id).await?;
    tx.commit().await?;

    info!(user_id = id, promoted, by = viewer.id, "promote");
    Ok(Redirect::to("/users").into_response())
}
