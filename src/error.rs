use thiserror::Error;

/// Everything a user action can fail with.
///
/// The first three variants are expected outcomes the shell turns into a
/// dialog; `Storage` is a real failure from the SQLite layer and is never
/// retried.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Please enter a valid amount.")]
    InvalidAmount { input: String },

    #[error("Please select a record to delete.")]
    EmptySelection,

    #[error("No expenses to analyze yet.")]
    NoData,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl ExpenseError {
    /// Dialog title shown for this error.
    pub fn title(&self) -> &'static str {
        match self {
            ExpenseError::InvalidAmount { .. } => "Error",
            ExpenseError::EmptySelection => "No Selection",
            ExpenseError::NoData => "No Data",
            ExpenseError::Storage(_) => "Storage Error",
        }
    }

    /// Dialog severity for this error.
    pub fn severity(&self) -> Severity {
        match self {
            ExpenseError::InvalidAmount { .. } | ExpenseError::Storage(_) => Severity::Error,
            ExpenseError::EmptySelection => Severity::Warning,
            ExpenseError::NoData => Severity::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

pub type Result<T> = std::result::Result<T, ExpenseError>;
