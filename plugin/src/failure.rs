//! Failure value reported by plugin operations to the game mod and UI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of failure the plugin reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    #[default]
    General,
    NotConnectedToServer,
    TestSoundInProgress,
}

impl FailureCode {
    /// Human readable text used when a failure carries no message of its own.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            FailureCode::General => "General failure",
            FailureCode::NotConnectedToServer => "Not connected to server",
            FailureCode::TestSoundInProgress => "Test sound already in progress",
        }
    }
}

/// A failure code with an optional free-text message.
///
/// Crosses the plugin boundary as `{"code": "...", "message": "..."}`, see
/// [`Failure::to_value`]. The boundary carries `what()`, so an explicit message
/// identical to the code's description reads back as a code-only failure: same
/// `code()` and `what()`, but not `==` to the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "FailureRecord", from = "FailureRecord")]
pub struct Failure {
    code: FailureCode,
    error: String,
}

impl Failure {
    #[must_use]
    pub fn new(code: FailureCode) -> Self {
        Self { code, error: String::new() }
    }

    /// A [`FailureCode::General`] failure described by `message`.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self { code: FailureCode::General, error: message.into() }
    }

    #[must_use]
    pub fn code(&self) -> FailureCode {
        self.code
    }

    /// The explicit message, or the code's description when there is none.
    #[must_use]
    pub fn what(&self) -> &str {
        if self.error.is_empty() {
            self.code.description()
        } else {
            &self.error
        }
    }

    /// Loosely-typed representation for scripting and UI consumers.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code,
            "message": self.what(),
        })
    }
}

impl From<FailureCode> for Failure {
    fn from(code: FailureCode) -> Self {
        Self::new(code)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::from_message(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::from_message(message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.what())
    }
}

impl std::error::Error for Failure {}

#[derive(Serialize, Deserialize)]
struct FailureRecord {
    code: FailureCode,
    #[serde(default)]
    message: String,
}

impl From<Failure> for FailureRecord {
    fn from(failure: Failure) -> Self {
        let message = failure.what().to_owned();
        Self { code: failure.code, message }
    }
}

/// A message equal to the code's description is indistinguishable from no message.
impl From<FailureRecord> for Failure {
    fn from(record: FailureRecord) -> Self {
        let error = if record.message == record.code.description() {
            String::new()
        } else {
            record.message
        };
        Self { code: record.code, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODES: [FailureCode; 3] = [
        FailureCode::General,
        FailureCode::NotConnectedToServer,
        FailureCode::TestSoundInProgress,
    ];

    #[test]
    fn code_is_preserved() {
        for code in CODES {
            assert_eq!(Failure::new(code).code(), code);
        }
    }

    #[test]
    fn default_is_general_without_text() {
        let failure = Failure::default();
        assert_eq!(failure.code(), FailureCode::General);
        assert_eq!(failure.what(), "General failure");
    }

    #[test]
    fn message_constructor_is_general() {
        let failure = Failure::from("custom message");
        assert_eq!(failure.code(), FailureCode::General);
        assert_eq!(failure.what(), "custom message");
        assert_eq!(failure.to_string(), "custom message");
    }

    #[test]
    fn code_only_failures_describe_themselves() {
        assert_eq!(
            Failure::new(FailureCode::NotConnectedToServer).what(),
            "Not connected to server"
        );
        assert_eq!(
            Failure::new(FailureCode::TestSoundInProgress).what(),
            "Test sound already in progress"
        );
    }

    #[test]
    fn boundary_value_shape() {
        let value = Failure::new(FailureCode::TestSoundInProgress).to_value();
        assert_eq!(value["code"], "test_sound_in_progress");
        assert_eq!(value["message"], "Test sound already in progress");

        let value = Failure::from("disk full").to_value();
        assert_eq!(value["code"], "general");
        assert_eq!(value["message"], "disk full");
    }

    #[test]
    fn serialized_failure_reads_back() {
        for failure in [
            Failure::new(FailureCode::NotConnectedToServer),
            Failure::from("socket closed"),
        ] {
            let json = serde_json::to_string(&failure).unwrap();
            let parsed: Failure = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, failure);
        }
    }

    #[test]
    fn missing_message_falls_back_to_description() {
        let parsed: Failure = serde_json::from_str(r#"{"code":"not_connected_to_server"}"#).unwrap();
        assert_eq!(parsed, Failure::new(FailureCode::NotConnectedToServer));
    }

    #[test]
    fn description_as_message_reads_back_code_only() {
        let failure = Failure::from_message("General failure");
        let parsed: Failure = serde_json::from_str(&serde_json::to_string(&failure).unwrap()).unwrap();

        assert_eq!(parsed.code(), failure.code());
        assert_eq!(parsed.what(), failure.what());
        assert_eq!(parsed, Failure::default());
        assert_ne!(parsed, failure);
    }
}
