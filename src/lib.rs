pub mod config;
pub mod error;
pub mod providers;
pub mod server;
mod utils;

pub use config::{Config, Credential};
pub use error::RelayError;
