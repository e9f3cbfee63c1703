//! Errors shared across the workspace.

/// Result type carrying an [`error_stack::Report`] of `E`.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Failed to parse struct: {0}")]
    StructParseFailure(&'static str),
    #[error("Failed to serialize to {0} format")]
    EncodeError(&'static str),
    #[error("Failed to convert i64 amount to decimal")]
    I64ToDecimalConversionFailure,
    #[error("Failed to convert decimal amount to i64")]
    DecimalToI64ConversionFailure,
    #[error("Failed to convert string `{error}` to decimal")]
    StringToDecimalConversionFailure { error: String },
    #[error("Amount does not fit into i64")]
    AmountOverflow,
    #[error("Failed to convert bytes to utf-8 string")]
    Utf8ConversionFailure,
}
