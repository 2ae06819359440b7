//! Web server module
//!
//! The optional HTTP mode: a query form and the same record lines the CLI
//! prints, served over axum.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
