pub mod config;
pub mod error;
pub mod gemini;
pub mod server;
pub mod tryon;

pub use error::{Error, Result};
