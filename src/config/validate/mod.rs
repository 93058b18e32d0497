//! Configuration validation
//!
//! Validates evaluation specifications before any model is run.

mod error;
mod validator;

#[cfg(test)]
mod tests;

pub use error::ValidationError;
pub use validator::validate_spec;
