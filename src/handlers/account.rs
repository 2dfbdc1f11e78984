use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::db::{self, NewUser, QaStorage};
use crate::error::QaError;
use crate::middleware::{DbTx, current_user, session};
use crate::router::QaState;
use crate::service::password;
use crate::templates::{LoginTemplate, RegisterTemplate, render};

pub const USER_EXISTS: &str = "User already exists!";
pub const MISSING_CREDENTIALS: &str = "Name and password are required";
pub const WRONG_PASSWORD: &str = "The password is incorrect";
pub const UNKNOWN_USERNAME: &str = "The username is incorrect";

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// GET /register
pub async fn register_page(jar: PrivateCookieJar, DbTx(mut tx): DbTx) -> Result<Response, QaError> {
    let viewer = current_user(&jar, &mut QaStorage::new(&mut tx)).await?;
    render(RegisterTemplate {
        viewer,
        error: None,
    })
}

/// POST /register -> create a plain member and sign them in.
pub async fn register_submit(
    State(state): State<QaState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, QaError> {
    let name = form.name.trim();
    // Hashed before the write lock is taken.
    let password_hash = if name.is_empty() || form.password.is_empty() {
        None
    } else {
        Some(password::hash_password(&form.password)?)
    };

    let mut tx = db::begin_write(&state.pool).await?;
    let mut store = QaStorage::new(&mut tx);
    let viewer = current_user(&jar, &mut store).await?;

    let Some(password_hash) = password_hash else {
        return render(RegisterTemplate {
            viewer,
            error: Some(MISSING_CREDENTIALS.to_string()),
        });
    };

    if store.user_by_name(name).await?.is_some() {
        return render(RegisterTemplate {
            viewer,
            error: Some(USER_EXISTS.to_string()),
        });
    }

    let created = store
        .create_user(NewUser {
            name,
            password_hash: &password_hash,
            expert: false,
            admin: false,
        })
        .await;
    let user_id = match created {
        Ok(id) => id,
        Err(e) if e.is_unique_violation() => {
            return render(RegisterTemplate {
                viewer,
                error: Some(USER_EXISTS.to_string()),
            });
        }
        Err(e) => return Err(e),
    };
    tx.commit().await?;

    info!(user_id, user = %name, "registered user");
    let jar = session::start(jar, user_id, state.session);
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /login
pub async fn login_page(jar: PrivateCookieJar, DbTx(mut tx): DbTx) -> Result<Response, QaError> {
    let viewer = current_user(&jar, &mut QaStorage::new(&mut tx)).await?;
    render(LoginTemplate {
        viewer,
        error: None,
    })
}

/// POST /login -> verify credentials and bind the session to the user.
pub async fn login_submit(
    State(state): State<QaState>,
    jar: PrivateCookieJar,
    DbTx(mut tx): DbTx,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, QaError> {
    let mut store = QaStorage::new(&mut tx);
    let viewer = current_user(&jar, &mut store).await?;

    let error = match store.user_by_name(form.name.trim()).await? {
        Some(user) if password::verify_password(&form.password, &user.password) => {
            tx.commit().await?;
            info!(user_id = user.id, "login succeeded");
            let jar = session::start(jar, user.id, state.session);
            return Ok((jar, Redirect::to("/")).into_response());
        }
        Some(user) => {
            info!(user_id = user.id, "login rejected: wrong password");
            WRONG_PASSWORD
        }
        None => {
            info!("login rejected: unknown username");
            UNKNOWN_USERNAME
        }
    };

    render(LoginTemplate {
        viewer,
        error: Some(error.to_string()),
    })
}

/// GET /logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (session::end(jar), Redirect::to("/"))
}
