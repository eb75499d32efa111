//! Errors surfaced by bracket operations.

use uuid::Uuid;

/// Errors that can occur while running a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// No match is pending, or the picked side holds no participant.
    InvalidState,
    /// Slot index other than 0 or 1.
    InvalidSlot(u8),
    /// Export requested from an empty placement list.
    EmptyExportSet,
    /// No bracket session with this id.
    SessionNotFound(Uuid),
    /// Writing the CSV export failed.
    Csv(String),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidState => write!(f, "Invalid state for this action"),
            BracketError::InvalidSlot(slot) => write!(f, "Slot must be 0 or 1 (got {})", slot),
            BracketError::EmptyExportSet => write!(f, "Nothing to export: placement list is empty"),
            BracketError::SessionNotFound(_) => write!(f, "No bracket"),
            BracketError::Csv(msg) => write!(f, "CSV export failed: {}", msg),
        }
    }
}

impl std::error::Error for BracketError {}

impl From<csv::Error> for BracketError {
    fn from(e: csv::Error) -> Self {
        BracketError::Csv(e.to_string())
    }
}
