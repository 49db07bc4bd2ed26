//! HTTP facade for FireWatch: the chat endpoints, the fire-map endpoints,
//! and the image detection pass-through.

pub mod config;
pub mod error;
pub mod handlers;
pub mod prompt;
pub mod router;
pub mod state;

pub use config::Config;
pub use router::app_router;
pub use state::AppState;
