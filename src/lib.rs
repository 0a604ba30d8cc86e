#![doc = "The `tasknexus` library crate."]
#![doc = ""]
#![doc = "Registration, login and bearer-token authentication, per-user task storage, and the"]
#![doc = "actix-web routes that expose them. `main.rs` only loads configuration, picks a"]
#![doc = "storage backend and starts the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;

pub use error::AppError;
pub use state::AppState;
