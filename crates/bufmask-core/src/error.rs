use thiserror::Error;

/// Errors returned by field decoders and the composer.
///
/// Every variant is an invalid-input condition: the call cannot succeed
/// without different bytes, a different mask, or different names.
///
/// # Examples
/// ```
/// use bufmask_core::{InvalidInput, uint16};
///
/// let err = uint16(&[0x01]).unwrap_err();
/// assert_eq!(err, InvalidInput::BadLength { expected: 2, actual: 1 });
/// assert!(err.to_string().contains("bad length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("invalid input: missing buffer")]
    MissingBuffer,
    #[error("invalid input: bad length: expected {expected} bytes, got {actual}")]
    BadLength { expected: usize, actual: usize },
    #[error("invalid input: empty mask")]
    EmptyMask,
    #[error("invalid input: mask longer than buffer: need {needed} bytes, got {actual}")]
    MaskLongerThanBuffer { needed: usize, actual: usize },
    #[error("invalid input: names/mask length mismatch: {names} names for {mask} fields")]
    NamesMaskMismatch { names: usize, mask: usize },
    #[error("invalid input: duplicate name '{name}'")]
    DuplicateName { name: String },
}
