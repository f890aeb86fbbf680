//! HTTP API

pub mod extract;
pub mod routes;
pub mod server;
pub mod validation;

pub use server::{build_state, create_router, run_server, AppState};
