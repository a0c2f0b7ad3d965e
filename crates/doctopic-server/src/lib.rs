//! DocTopic server: HTTP API and offline commands over the analysis crates.

pub mod cli;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
