/// Returned when text cannot be read as a ledger amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a non-negative integer amount")]
pub struct AmountError(pub String);

/// Errors that occur when parsing or constructing coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// Returned when the text does not have the expected separators.
    #[error("Invalid format '{input}', expected {expected}")]
    Format {
        input: String,
        expected: &'static str,
    },

    #[error("Lng & Lat must be a number, got '{0}'")]
    NotANumber(String),

    #[error("Lng & Lat must be finite numbers")]
    NotFinite,

    #[error("Latitude must be between -90 and 90 degrees inclusive.")]
    Latitude(f64),

    #[error("Longitude must be between -180 and 180 degrees inclusive.")]
    Longitude(f64),
}
