use thiserror::Error;

/// Errors raised by boundary-line mutations.
///
/// Every variant is recoverable: the operation that produced it leaves the
/// boundary set exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    /// The requested position lies outside the allowed mass domain.
    #[error("Invalid line position. Please enter a value between {min:.2} and {max:.2}.")]
    OutOfRange { position: f64, min: f64, max: f64 },

    /// A boundary line at exactly this position already exists.
    #[error("A line at {0:.2} is already present.")]
    Duplicate(f64),

    /// A manually typed position failed to parse as a number.
    #[error("Invalid line position. Please enter a number.")]
    NotANumber(String),
}
