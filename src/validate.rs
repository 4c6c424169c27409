use crate::error::MedianWindowError;

/// Number of emissions produced by a window of width `window` and step
/// `step` sliding over `input_len` samples.
#[inline]
pub fn output_len(input_len: usize, window: usize, step: usize) -> usize {
  (input_len - window) / step + 1
}

/// Rejects a malformed `(input, window, step)` combination before
/// `output_len` is ever computed from it: a non-empty input, a window width
/// of at least two that fits in the input, and a nonzero step. Safe to call
/// before the caller has sized an output buffer at all.
pub fn validate_args(input_len: usize, window: usize, step: usize) -> Result<(), MedianWindowError> {
  if input_len == 0 {
    return Err(MedianWindowError::EmptyInput);
  }

  if window <= 1 {
    return Err(MedianWindowError::WindowTooSmall(window));
  }

  if window > input_len {
    return Err(MedianWindowError::WindowLargerThanInput { window, input_len });
  }

  if step == 0 {
    return Err(MedianWindowError::ZeroStep);
  }

  Ok(())
}

/// Rejects malformed `(input, window, step, output)` combinations before any
/// allocation happens, per the validation rules of the sliding median
/// window: a non-empty input, a window width of at least two that fits in
/// the input, a nonzero step, and an output buffer sized to match.
pub fn validate(
  input_len: usize,
  window: usize,
  step: usize,
  output_len_actual: usize,
) -> Result<(), MedianWindowError> {
  validate_args(input_len, window, step)?;

  let expected = output_len(input_len, window, step);
  if output_len_actual != expected {
    return Err(MedianWindowError::OutputLengthMismatch {
      expected,
      actual: output_len_actual,
    });
  }

  Ok(())
}
