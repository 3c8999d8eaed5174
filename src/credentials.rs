//! Token wrapper shared by the Heroku and GitHub gateways.

use std::fmt;

use crate::error::ReviewAppError;

/// API token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::MissingInput`] naming `input` when the
    /// supplied string is blank.
    pub fn new(token: impl AsRef<str>, input: &'static str) -> Result<Self, ReviewAppError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ReviewAppError::MissingInput { name: input });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

// Tokens end up in tracing spans via `Debug`; never print the secret.
impl fmt::Debug for ApiToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ApiToken(***)")
    }
}
