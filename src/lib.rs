pub mod credential;
pub mod error;
pub mod gemini;
pub mod timed;
pub mod tracing;
pub mod validate;

pub use error::{Error, Result};
