use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::Transaction;

use crate::db::{self, Db};
use crate::error::QaError;
use crate::router::QaState;

/// Request-scoped read transaction.
///
/// Handlers commit once their work succeeded. Any other exit drops the
/// transaction, which rolls it back and returns the connection to the pool.
pub struct DbTx(pub Transaction<'static, Db>);

impl FromRequestParts<QaState> for DbTx {
    type Rejection = QaError;

    async fn from_request_parts(_parts: &mut Parts, state: &QaState) -> Result<Self, Self::Rejection> {
        let tx = state.pool.begin().await?;
        Ok(Self(tx))
    }
}

/// Request-scoped transaction for handlers that write.
///
/// Holds the store's write lock from the first statement, so overlapping
/// writers are serialized by the store. Same commit/rollback rules as `DbTx`.
pub struct WriteTx(pub Transaction<'static, Db>);

impl FromRequestParts<QaState> for WriteTx {
    type Rejection = QaError;

    async fn from_request_parts(_parts: &mut Parts, state: &QaState) -> Result<Self, Self::Rejection> {
        let tx = db::begin_write(&state.pool).await?;
        Ok(Self(tx))
    }
}
