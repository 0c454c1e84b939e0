use thiserror::Error;

/// Error when parsing a string into one of the closed vocabularies
/// (platform, difficulty, status, time range).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} '{invalid}'. Valid values: {}", .expected.join(", "))]
pub struct ParseEnumError {
    kind: &'static str,
    invalid: String,
    expected: &'static [&'static str],
}

impl ParseEnumError {
    pub fn new(kind: &'static str, invalid: &str, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            invalid: invalid.to_string(),
            expected,
        }
    }

    /// The rejected input.
    pub fn invalid(&self) -> &str {
        &self.invalid
    }
}
