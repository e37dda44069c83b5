use std::fmt;

/// Positional audio decoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    PacketTooShort { expected: usize, got: usize },
    UnsupportedVersion(u16),
    TooManyClients(usize),
}

impl ProtocolError {
    /// Returns true when more input could turn this error into a successful decode.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ProtocolError::PacketTooShort { .. })
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::PacketTooShort { expected, got } => {
                write!(f, "packet too short: expected at least {expected} bytes, got {got}")
            }
            ProtocolError::UnsupportedVersion(version) => {
                write!(f, "unsupported positional audio version: {version}")
            }
            ProtocolError::TooManyClients(count) => {
                write!(f, "too many client positions: {count} (max {})", u8::MAX)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}
