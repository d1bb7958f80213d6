//! Per-user high score API
//!
//! Users are keyed by a numeric id and by their Google account id. The
//! router is plain data in, data out; only `http` touches the network.

#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod model;
pub mod routes;
pub mod store;

pub use model::{NewUser, User};
pub use routes::{ApiError, Method, Response, handle};
pub use store::{MemStore, StoreError, UserStore};
