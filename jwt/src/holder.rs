use crate::prelude::*;

/// Holds at most one error about one segment of the token
///
/// Cleared at the start of every conversion pass, then repopulated. Setting an error while one is
/// already held replaces it.
#[derive(Debug, Default)]
pub struct ErrorHolder {
    error: Option<JwtToolError>,
}

impl ErrorHolder {
    /// Replaces the held error
    pub fn set(&mut self, error: JwtToolError) {
        self.error = Some(error);
    }

    /// Forgets the held error
    pub fn clear(&mut self) {
        self.error = None;
    }

    /// Whether an error is held
    pub fn is_set(&self) -> bool {
        self.error.is_some()
    }

    /// The held error
    pub fn get(&self) -> Option<&JwtToolError> {
        self.error.as_ref()
    }

    /// Display text of the held error
    pub fn message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Holds the error of a failed result, or hands back the value of a successful one
    pub fn check<T>(&mut self, result: JwtToolResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.set(e);
                None
            }
        }
    }
}
