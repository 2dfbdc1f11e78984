pub mod auth;
pub mod session;
pub mod tx;

pub use auth::{Role, require};
pub use session::{SessionSettings, current_user};
pub use tx::{DbTx, WriteTx};
