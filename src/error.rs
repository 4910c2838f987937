//! Error handling for the print costing engine

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Currency;

/// Application error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    // Extraction errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    // Conversion errors
    #[error("no exchange rate for currency {0}")]
    UnknownCurrency(Currency),

    // Calculation and configuration errors
    #[error("invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    // Inventory errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("insufficient filament: {available_g} g available, {requested_g} g requested")]
    InsufficientFilament {
        available_g: Decimal,
        requested_g: Decimal,
    },

    #[error("brand '{0}' already exists")]
    DuplicateBrand(String),

    #[error("brand '{0}' is used by existing filaments")]
    BrandInUse(String),
}

/// G-code extraction failures
///
/// Partial metadata is not an error; these fire only when the input is
/// unusable as a whole.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("input contains no G-code commands or comments")]
    NoGcodeContent,

    #[error("no filament usage or print time metadata found")]
    NoMetadata,
}

impl AppError {
    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;
