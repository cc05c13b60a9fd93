//! HTTP boundary of the Stellar URL shortener.
//!
//! Exposes the registry over JSON endpoints and maps registry errors to
//! HTTP statuses. The `gateway` binary wires storage and generator
//! selection from the command line.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
