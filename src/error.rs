use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the whole crate.
pub type Result<T> = std::result::Result<T, NnError>;

/// Everything that can go wrong while building, training or feeding a network.
#[derive(Debug)]
pub enum NnError {
    /// A vector did not have the width its consumer requires.
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidArchitecture(String),
    InvalidHyperparameter(String),
    /// A code handed to `decode` was never produced while fitting the encoder.
    UnknownLabel { code: usize, known: usize },
    /// A label string handed to `apply_encode` was not seen while fitting.
    UnseenCategory(String),
    NotFitted(&'static str),
    Data(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
}

impl Display for NnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NnError::DimensionMismatch { what, got, expected } => {
                write!(f, "dimension mismatch for {what}: got {got}, expected {expected}")
            }
            NnError::InvalidArchitecture(msg) => write!(f, "invalid architecture: {msg}"),
            NnError::InvalidHyperparameter(msg) => write!(f, "invalid hyperparameter: {msg}"),
            NnError::UnknownLabel { code, known } => write!(
                f,
                "unknown label code {code}, the encoder only knows {known} classes"
            ),
            NnError::UnseenCategory(label) => {
                write!(f, "label '{label}' was not seen when the encoder was fitted")
            }
            NnError::NotFitted(what) => write!(f, "{what} must be fitted before it is applied"),
            NnError::Data(msg) => write!(f, "malformed data: {msg}"),
            NnError::Io(e) => write!(f, "io error: {e}"),
            NnError::Json(e) => write!(f, "json error: {e}"),
            NnError::Csv(e) => write!(f, "csv error: {e}"),
        }
    }
}

impl Error for NnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NnError::Io(e) => Some(e),
            NnError::Json(e) => Some(e),
            NnError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NnError {
    fn from(e: std::io::Error) -> Self {
        NnError::Io(e)
    }
}

impl From<serde_json::Error> for NnError {
    fn from(e: serde_json::Error) -> Self {
        NnError::Json(e)
    }
}

impl From<csv::Error> for NnError {
    fn from(e: csv::Error) -> Self {
        NnError::Csv(e)
    }
}

/// Fails with `DimensionMismatch` unless `got == expected`.
pub(crate) fn ensure_width(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(NnError::DimensionMismatch { what, got, expected });
    }
    Ok(())
}
