//! HTTP transport: routing and wire protocol

pub mod protocol;
pub mod routes;

pub use routes::build_router;
