//! # Application State
//!
//! Shared state for the Axum application: one immutable [`Validator`].

use attest_validator::Validator;

/// Shared application state passed to all route handlers.
pub struct AppState<L, R> {
    pub validator: Validator<L, R>,
}

impl<L, R> AppState<L, R> {
    pub fn new(validator: Validator<L, R>) -> Self {
        Self { validator }
    }
}

impl<L, R> Clone for AppState<L, R> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
        }
    }
}
