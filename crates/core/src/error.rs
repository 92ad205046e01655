//! Domain error model.

use thiserror::Error;

/// Rejection of a raw input field.
///
/// Malformed input is a normal, expected case: validators return one of these
/// instead of panicking, and the HTTP layer maps them to 400 responses. Each
/// variant carries a stable machine-checkable code (see [`code`]) alongside
/// the human-readable `Display` message.
///
/// [`code`]: ValidationError::code
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name missing, not text, wrong length, or outside the letter/space
    /// alphabet. The message names the specific rule that failed.
    #[error("{0}")]
    InvalidName(String),

    #[error("description must be text")]
    DescriptionNotText,

    #[error("description cannot exceed 500 characters")]
    DescriptionTooLong,

    #[error("price is required")]
    PriceRequired,

    #[error("price must be a valid number")]
    PriceNotNumeric,

    #[error("price cannot be negative")]
    PriceNegative,

    #[error("price exceeds the maximum allowed value")]
    PriceTooLarge,

    #[error("id is not a valid v4 UUID")]
    InvalidIdentifier,
}

impl ValidationError {
    pub fn invalid_name(msg: impl Into<String>) -> Self {
        Self::InvalidName(msg.into())
    }

    /// Stable error code for API responses. Messages may be reworded; these
    /// stay fixed.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "invalid_name",
            Self::DescriptionNotText => "description_not_text",
            Self::DescriptionTooLong => "description_too_long",
            Self::PriceRequired => "price_required",
            Self::PriceNotNumeric => "price_not_numeric",
            Self::PriceNegative => "price_negative",
            Self::PriceTooLarge => "price_too_large",
            Self::InvalidIdentifier => "invalid_identifier",
        }
    }
}
