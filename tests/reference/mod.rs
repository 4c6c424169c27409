//! Sort-and-pick median oracle used by the property tests, grounded in
//! `examples/original_source/test/mediantester.h`'s
//! `median_tester_gen_medians`: compact out NaNs (unless the strict policy
//! says otherwise), sort what remains, and pick the middle element(s).
pub fn oracle_medians(input: &[f64], window: usize, step: usize, strict_nan: bool) -> Vec<f64> {
  let mut out = Vec::new();
  let mut start = 0;
  while start + window <= input.len() {
    out.push(oracle_median_of(&input[start..start + window], strict_nan));
    start += step;
  }
  out
}

pub fn oracle_median_of(window: &[f64], strict_nan: bool) -> f64 {
  if strict_nan && window.iter().any(|x| x.is_nan()) {
    return f64::NAN;
  }

  let mut valid: Vec<f64> = window.iter().copied().filter(|x| !x.is_nan()).collect();
  if valid.is_empty() {
    return f64::NAN;
  }

  valid.sort_by(|a, b| a.partial_cmp(b).unwrap());
  let mid = valid.len() / 2;
  if valid.len() % 2 == 0 {
    (valid[mid - 1] + valid[mid]) / 2.0
  } else {
    valid[mid]
  }
}
