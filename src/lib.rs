#![deny(bad_style, future_incompatible, missing_debug_implementations, rust_2018_idioms)]

//! A sliding-median-window engine over `f64` sequences.
//!
//! [`sliding_median_window`] computes one median per sampling step over a
//! fixed-width window sliding across an input sequence, dispatching between
//! two strategies depending on the window width:
//!
//! - widths 2 through 8 use branch-light sort/median comparator networks
//!   ([`networks`]), re-evaluated per emission ([`small`]);
//! - widths 9 and up use an incrementally maintained dual heap with a FIFO
//!   overlay for in-place eviction of the oldest sample ([`heap`], [`large`]).
//!
//! Both strategies honor the same [`NanPolicy`] switch and agree on the
//! median for every window position.

mod error;
mod heap;
mod large;
mod networks;
mod policy;
mod small;
mod validate;

pub use crate::error::MedianWindowError;
pub use crate::policy::NanPolicy;

/// Window widths at or below this threshold are routed to the small-window
/// comparator-network engine; wider windows use the dual-heap engine.
pub const TINY_MEDIANWINDOW_THRESHOLD: usize = 8;

/// Computes one median per sampling step over `input`, writing
/// `(input.len() - window) / step + 1` values into `output`.
///
/// `output` must already be exactly that length; on any validation failure
/// (see [`MedianWindowError`]) nothing is written and the error is returned.
/// This is the zero-allocation entry point; see [`sliding_median_window_vec`]
/// for a convenience wrapper that allocates the output buffer for you.
///
/// # Examples
///
/// ```
/// use medianwindow::{sliding_median_window, NanPolicy};
///
/// let input = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let mut output = [0.0; 6];
/// sliding_median_window(&input, 5, 1, NanPolicy::Tolerant, &mut output).unwrap();
/// assert_eq!(output, [3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
/// ```
pub fn sliding_median_window(
  input: &[f64],
  window: usize,
  step: usize,
  policy: NanPolicy,
  output: &mut [f64],
) -> Result<(), MedianWindowError> {
  validate::validate(input.len(), window, step, output.len())?;

  if window <= TINY_MEDIANWINDOW_THRESHOLD {
    small::run(input, window, step, policy, output);
  } else {
    let mut engine = large::LargeWindowEngine::new(window, step)?;
    engine.run(input, policy, output);
  }

  Ok(())
}

/// Convenience wrapper around [`sliding_median_window`] that allocates and
/// returns the output buffer instead of requiring the caller to pre-size
/// one.
pub fn sliding_median_window_vec(
  input: &[f64],
  window: usize,
  step: usize,
  policy: NanPolicy,
) -> Result<Vec<f64>, MedianWindowError> {
  validate::validate_args(input.len(), window, step)?;
  let len = validate::output_len(input.len(), window, step);
  let mut output = vec![0.0; len];
  sliding_median_window(input, window, step, policy, &mut output)?;
  Ok(output)
}
