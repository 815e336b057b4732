use super::Error;
use serde::{Deserialize, Serialize};

/// Uniform response body of every backend call: `{ success, data, errors? }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> Envelope<T> {
    /// The conventional human-readable message, `errors[0]`.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(String::as_str)
    }

    /// Unwraps `data` of a successful envelope.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] carrying `errors` when `success` is false, or
    /// [`Error::Decode`] when a successful envelope carries no data.
    pub fn into_data(self) -> Result<T, Error> {
        if !self.success {
            return Err(Error::Validation {
                status: 200,
                errors: self.errors.unwrap_or_default(),
            });
        }
        self.data
            .ok_or_else(|| Error::Decode("successful response without data".to_string()))
    }
}
