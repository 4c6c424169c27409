//! Fixed-width sort/median comparator networks for window widths 2 through 8.
//!
//! The comparator schedules below are the standard minimum-comparator median
//! networks (plus two full sorting networks used as an optimization for
//! widths 5 and 7), ported from the reference C implementation's
//! `tiny_medianwindow.c`. Every network is strictly data-oblivious: it runs
//! the same fixed sequence of compare-and-swap pairs regardless of input, so
//! it contains no early exits and no data-dependent branches.
use crate::policy::NanPolicy;

#[inline]
fn cswap(values: &mut [f64], a: usize, b: usize) {
  if values[a] > values[b] {
    values.swap(a, b);
  }
}

#[inline]
fn median_network_2(v: &mut [f64]) {
  cswap(v, 0, 1);
}

#[inline]
fn median_network_3(v: &mut [f64]) {
  cswap(v, 0, 1);
  cswap(v, 1, 2);
  cswap(v, 0, 1);
}

#[inline]
fn median_network_4(v: &mut [f64]) {
  cswap(v, 0, 1);
  cswap(v, 2, 3);
  cswap(v, 0, 2);
  cswap(v, 1, 3);
}

#[inline]
fn median_network_5(v: &mut [f64]) {
  cswap(v, 0, 1);
  cswap(v, 2, 3);
  cswap(v, 0, 2);
  cswap(v, 1, 3);
  cswap(v, 2, 4);
  cswap(v, 1, 2);
  cswap(v, 2, 4);
}

#[inline]
fn median_network_6(v: &mut [f64]) {
  cswap(v, 0, 1);
  cswap(v, 4, 5);
  cswap(v, 0, 5);
  cswap(v, 1, 3);
  cswap(v, 2, 4);
  cswap(v, 0, 2);
  cswap(v, 1, 4);
  cswap(v, 3, 5);
  cswap(v, 1, 2);
  cswap(v, 3, 4);
}

#[inline]
fn sorting_network_6(v: &mut [f64]) {
  cswap(v, 0, 3);
  cswap(v, 1, 4);
  cswap(v, 2, 5);
  cswap(v, 0, 2);
  cswap(v, 3, 5);
  cswap(v, 1, 3);
  cswap(v, 2, 4);
  cswap(v, 0, 1);
  cswap(v, 2, 3);
  cswap(v, 4, 5);
  cswap(v, 1, 2);
  cswap(v, 3, 4);
}

#[inline]
fn median_network_7(v: &mut [f64]) {
  cswap(v, 0, 6);
  cswap(v, 1, 2);
  cswap(v, 3, 4);
  cswap(v, 0, 2);
  cswap(v, 1, 4);
  cswap(v, 3, 5);
  cswap(v, 0, 1);
  cswap(v, 2, 5);
  cswap(v, 4, 6);
  cswap(v, 1, 3);
  cswap(v, 2, 4);
  cswap(v, 3, 4);
  cswap(v, 2, 3);
}

#[inline]
fn median_network_8(v: &mut [f64]) {
  cswap(v, 0, 2);
  cswap(v, 1, 3);
  cswap(v, 4, 6);
  cswap(v, 5, 7);
  cswap(v, 0, 4);
  cswap(v, 1, 5);
  cswap(v, 2, 6);
  cswap(v, 3, 7);
  cswap(v, 0, 1);
  cswap(v, 2, 4);
  cswap(v, 3, 5);
  cswap(v, 6, 7);
  cswap(v, 2, 3);
  cswap(v, 4, 5);
  cswap(v, 1, 4);
  cswap(v, 3, 6);
}

#[inline]
fn sorting_network_8(v: &mut [f64]) {
  cswap(v, 0, 5);
  cswap(v, 1, 3);
  cswap(v, 2, 7);
  cswap(v, 4, 6);
  cswap(v, 0, 2);
  cswap(v, 1, 4);
  cswap(v, 3, 6);
  cswap(v, 5, 7);
  cswap(v, 0, 1);
  cswap(v, 2, 4);
  cswap(v, 3, 5);
  cswap(v, 6, 7);
  cswap(v, 1, 3);
  cswap(v, 4, 6);
  cswap(v, 2, 3);
  cswap(v, 4, 5);
  cswap(v, 1, 2);
  cswap(v, 3, 4);
  cswap(v, 5, 6);
}

/// Compacts `window` into `out[..]`, returning the number of non-NaN values
/// written to its front. `out` must be at least as long as `window`.
fn compact_non_nan(window: &[f64], out: &mut [f64]) -> usize {
  let mut n = 0;
  for &x in window {
    if !x.is_nan() {
      out[n] = x;
      n += 1;
    }
  }
  n
}

/// Median of a NaN-free, not-yet-sorted slice of length `v.len() in 0..=8`,
/// applying the minimum-comparator network for that length.
fn median_of_valid(v: &mut [f64]) -> f64 {
  match v.len() {
    0 => f64::NAN,
    1 => v[0],
    2 => {
      median_network_2(v);
      (v[0] + v[1]) / 2.0
    }
    3 => {
      median_network_3(v);
      v[1]
    }
    4 => {
      median_network_4(v);
      (v[1] + v[2]) / 2.0
    }
    5 => {
      median_network_5(v);
      v[2]
    }
    6 => {
      median_network_6(v);
      (v[2] + v[3]) / 2.0
    }
    7 => {
      median_network_7(v);
      v[3]
    }
    8 => {
      median_network_8(v);
      (v[3] + v[4]) / 2.0
    }
    _ => unreachable!("small-window engine only handles widths 2..=8"),
  }
}

/// Computes the median of `window` (length `2..=8`) under the given NaN
/// policy.
///
/// Under the tolerant policy, for an all-finite window of width 5 or 7 this
/// pads to a full 6- or 8-wide sorting network with a `+INFINITY` sentinel
/// rather than using the minimum-comparator median network — an internal
/// optimization that yields the same order statistic, since §4.2 notes it
/// must fall back to the minimum-comparator network whenever the input
/// contains any non-finite value (the sentinel would otherwise collide with
/// a genuine `+INFINITY` sample).
pub fn median_of_window(window: &[f64], policy: NanPolicy) -> f64 {
  debug_assert!((2..=8).contains(&window.len()));

  if policy.is_strict() {
    if window.iter().any(|x| x.is_nan()) {
      return f64::NAN;
    }
    return median_of_valid_full_width(window);
  }

  let has_non_finite = window.iter().any(|x| !x.is_finite());
  if !has_non_finite {
    return median_of_valid_full_width(window);
  }

  let mut buf = [0.0f64; 8];
  let n = compact_non_nan(window, &mut buf);
  median_of_valid(&mut buf[..n])
}

/// Median over a full-width (no NaN removed) window, using the +infinity
/// sentinel padding trick for widths 5 and 7 when the window is entirely
/// finite, exactly as `spec.md` §4.2 allows.
fn median_of_valid_full_width(window: &[f64]) -> f64 {
  let all_finite = window.iter().all(|x| x.is_finite());

  match window.len() {
    2 => {
      let mut v = [window[0], window[1]];
      median_network_2(&mut v);
      (v[0] + v[1]) / 2.0
    }
    3 => {
      let mut v = [window[0], window[1], window[2]];
      median_network_3(&mut v);
      v[1]
    }
    4 => {
      let mut v = [window[0], window[1], window[2], window[3]];
      median_network_4(&mut v);
      (v[1] + v[2]) / 2.0
    }
    5 if all_finite => {
      let mut v = [window[0], window[1], window[2], window[3], window[4], f64::INFINITY];
      sorting_network_6(&mut v);
      v[2]
    }
    5 => {
      let mut v = [window[0], window[1], window[2], window[3], window[4]];
      median_network_5(&mut v);
      v[2]
    }
    6 => {
      let mut v = [window[0], window[1], window[2], window[3], window[4], window[5]];
      median_network_6(&mut v);
      (v[2] + v[3]) / 2.0
    }
    7 if all_finite => {
      let mut v = [
        window[0], window[1], window[2], window[3], window[4], window[5], window[6], f64::INFINITY,
      ];
      sorting_network_8(&mut v);
      v[3]
    }
    7 => {
      let mut v = [window[0], window[1], window[2], window[3], window[4], window[5], window[6]];
      median_network_7(&mut v);
      v[3]
    }
    8 => {
      let mut v = [
        window[0], window[1], window[2], window[3], window[4], window[5], window[6], window[7],
      ];
      median_network_8(&mut v);
      (v[3] + v[4]) / 2.0
    }
    _ => unreachable!("small-window engine only handles widths 2..=8"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn even_width_average_of_middle_pair() {
    assert_eq!(median_of_window(&[1.0, 2.0, 3.0, 4.0], NanPolicy::Tolerant), 2.5);
  }

  #[test]
  fn odd_width_middle_element() {
    assert_eq!(median_of_window(&[5.0, 1.0, 3.0], NanPolicy::Tolerant), 3.0);
  }

  #[test]
  fn strict_policy_any_nan_yields_nan() {
    assert!(median_of_window(&[1.0, f64::NAN, 3.0], NanPolicy::Strict).is_nan());
  }

  #[test]
  fn tolerant_policy_compacts_around_nan() {
    assert_eq!(median_of_window(&[f64::NAN, 1.0, 2.0, 3.0], NanPolicy::Tolerant), 2.0);
  }

  #[test]
  fn tolerant_policy_all_nan_yields_nan() {
    assert!(median_of_window(&[f64::NAN, f64::NAN], NanPolicy::Tolerant).is_nan());
  }

  #[test]
  fn tolerant_policy_single_survivor_is_emitted_directly() {
    assert_eq!(
      median_of_window(&[f64::NAN, f64::NAN, f64::NAN, 42.5, f64::NAN], NanPolicy::Tolerant),
      42.5
    );
  }

  #[test]
  fn infinities_participate_as_ordered_values() {
    assert_eq!(
      median_of_window(&[f64::INFINITY, 1.0, 2.0, 3.0, 4.0], NanPolicy::Tolerant),
      3.0
    );
  }

  #[test]
  fn averaging_plus_and_minus_infinity_yields_nan() {
    let median = median_of_window(&[f64::NEG_INFINITY, f64::INFINITY], NanPolicy::Tolerant);
    assert!(median.is_nan());
  }

  #[test]
  fn width_eight_all_finite_matches_minimum_comparator_network() {
    let window = [8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
    assert_eq!(median_of_window(&window, NanPolicy::Tolerant), 4.5);
  }

  #[test]
  fn width_five_infinity_sentinel_path_matches_plain_network() {
    // All-finite width-5 window: the +infinity-sentinel padded path and the
    // plain minimum-comparator network must agree.
    let window = [10.0, 2.0, 33.0, 4.0, 5.0];
    let mut plain = window;
    let expected = median_of_valid(&mut plain);
    assert_eq!(median_of_window(&window, NanPolicy::Tolerant), expected);
  }

  #[test]
  fn width_seven_infinity_sentinel_path_matches_plain_network() {
    let window = [10.0, 2.0, 33.0, 4.0, 5.0, -1.0, 9.0];
    let mut plain = window;
    let expected = median_of_valid(&mut plain);
    assert_eq!(median_of_window(&window, NanPolicy::Tolerant), expected);
  }
}
