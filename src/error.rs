//! Error types for the action-print-layout library

use thiserror::Error;

/// Result type alias using LayoutError
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors that can occur while paginating and writing action summaries
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A required tunable is missing or malformed at the point of use
    #[error("Invalid layout customization: {0}")]
    InvalidCustomization(String),

    /// No global default customization record exists
    #[error("No global default layout customization found")]
    MissingDefault,

    /// Variable key that is not one of the customization fields
    #[error("Unsupported variable key {0}")]
    UnsupportedVariable(String),

    /// Value of the wrong shape for a customization field
    #[error("Invalid value for variable {key}: {reason}")]
    InvalidVariableValue { key: String, reason: String },

    /// Field name with no column label in the action table
    #[error("Field {0} has no column in the action table")]
    UnknownField(String),

    /// Field name mapped to more than one column label
    #[error("Field {field} maps to {count} columns, expected exactly one")]
    AmbiguousField { field: String, count: usize },

    /// Row shape violation
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Error decoding customization records
    #[error("Customization JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the xlsx writer
    #[error("Spreadsheet operation failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Error from the underlying lopdf library
    #[cfg(feature = "pdf")]
    #[error("PDF operation failed: {0}")]
    Pdf(#[from] lopdf::Error),
}
