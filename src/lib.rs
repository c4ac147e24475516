//! Blog comment platform: an actix-web API over MongoDB and a headless
//! client that keeps the browser-side comment state in sync with it.

pub mod client;
pub mod comment;
pub mod config;
pub mod database;
pub mod middleware;
pub mod post;
pub mod router;
pub mod state;
pub mod user;
pub mod utils;

pub use state::AppState;
