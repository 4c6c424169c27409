use thiserror::Error;

/// Failure modes of [`crate::sliding_median_window`].
///
/// These mirror the single boolean failure result of the underlying
/// algorithm (invalid arguments or allocation failure); numeric outcomes
/// such as a NaN or infinite median are never errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedianWindowError {
  /// The input sequence contained no samples.
  #[error("input sequence is empty")]
  EmptyInput,

  /// `window` was `0` or `1`; a median window needs at least two samples.
  #[error("window width {0} must be at least 2")]
  WindowTooSmall(usize),

  /// `window` was larger than the number of available input samples.
  #[error("window width {window} is larger than the input length {input_len}")]
  WindowLargerThanInput { window: usize, input_len: usize },

  /// `step` was `0`.
  #[error("step must be nonzero")]
  ZeroStep,

  /// The caller-provided output buffer did not match the required length.
  #[error("output buffer has length {actual}, expected {expected}")]
  OutputLengthMismatch { expected: usize, actual: usize },

  /// The large-window engine's node arena could not be allocated.
  #[error("failed to allocate the window arena")]
  Allocation,
}
