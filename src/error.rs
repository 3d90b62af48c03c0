use thiserror::Error;

/// Errors returned when a sketch cannot be built or its registers cannot be replaced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    #[error("precision {precision} exceeds hash width of {max} bits")]
    PrecisionOutOfRange { precision: u8, max: u8 },
    #[error("precision {precision} requires more registers than can be addressed")]
    TooManyRegisters { precision: u8 },
    #[error("standard error {0} must be in the range (0, 1)")]
    InvalidErrorRate(f64),
    #[error("expected {expected} registers, got {actual}")]
    RegisterCountMismatch { expected: usize, actual: usize },
    #[error("register {index} has rank {value}, maximum is {max}")]
    RegisterOutOfRange { index: usize, value: u8, max: u8 },
}
