use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("lockfile decode error: {0}")]
    Decode(String),
    #[error("malformed reference '{reference}': {reason}")]
    MalformedReference { reference: String, reason: String },
    #[error("node '{missing}' required by {package} is not in the lockfile graph")]
    DanglingReference { missing: String, package: String },
}

impl From<serde_json::Error> for LockError {
    fn from(err: serde_json::Error) -> Self {
        LockError::Decode(err.to_string())
    }
}

/// Stable, machine-readable classification of a [`LockError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    MalformedReference,
    DanglingReference,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Decode => "decode",
            ErrorKind::MalformedReference => "malformed-reference",
            ErrorKind::DanglingReference => "dangling-reference",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LockError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LockError::Decode(_) => ErrorKind::Decode,
            LockError::MalformedReference { .. } => ErrorKind::MalformedReference,
            LockError::DanglingReference { .. } => ErrorKind::DanglingReference,
        }
    }

    pub(crate) fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        LockError::MalformedReference {
            reference: reference.to_owned(),
            reason: reason.into(),
        }
    }
}
