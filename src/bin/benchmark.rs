//! Reference implementation of the external benchmark harness described by
//! the sliding median window system: generates a seeded-random input
//! sequence with exact counts of NaN and +/-infinity scattered at shuffled
//! positions, runs the engine once, and reports wall time.
//!
//! Mirrors `examples/original_source/benchmark/benchmark.c`'s
//! `benchmark_start`, translated from a seeded libc `rand()` to a seeded
//! `rand::rngs::StdRng` for the same reproducibility guarantee.
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use medianwindow::{sliding_median_window, NanPolicy};

const RANDOM_SEED: u64 = 0xC0FFEE;

/// Benchmarks the sliding median window engine over a generated input.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
  /// Number of samples in the generated input sequence.
  n: usize,
  /// Number of NaN samples to scatter through the input.
  nan_count: usize,
  /// Number of +/-infinity samples to scatter through the input.
  inf_count: usize,
  /// Lower bound (inclusive) of the generated finite samples.
  low: f64,
  /// Upper bound (exclusive) of the generated finite samples.
  high: f64,
  /// Window width.
  window: usize,
  /// Step between emissions.
  step: usize,
  /// Whether a NaN anywhere in a window should force that window's median
  /// to NaN ("true") or be excluded from it ("false").
  strict_nan: StrictNanArg,
}

#[derive(Debug, Clone, Copy)]
struct StrictNanArg(bool);

impl std::str::FromStr for StrictNanArg {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "true" => Ok(StrictNanArg(true)),
      "false" => Ok(StrictNanArg(false)),
      other => Err(format!("expected \"true\" or \"false\", got {other:?}")),
    }
  }
}

fn main() -> ExitCode {
  let args = Args::parse();

  if let Err(message) = validate_args(&args) {
    eprintln!("{message}");
    return ExitCode::FAILURE;
  }

  let policy = if args.strict_nan.0 { NanPolicy::Strict } else { NanPolicy::Tolerant };

  let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
  let input = generate_input(&args, &mut rng);

  let output_len = (args.n - args.window) / args.step + 1;
  let mut output = vec![0.0; output_len];

  let start = Instant::now();
  let result = sliding_median_window(&input, args.window, args.step, policy, &mut output);
  let elapsed = start.elapsed();

  match result {
    Ok(()) => {
      println!("Time taken: {:.9}", elapsed.as_secs_f64());
      ExitCode::SUCCESS
    }
    Err(err) => {
      eprintln!("It seems like there was an error: {err}");
      ExitCode::FAILURE
    }
  }
}

fn validate_args(args: &Args) -> Result<(), String> {
  if args.n == 0 {
    return Err("N must be nonzero".to_string());
  }
  if args.nan_count + args.inf_count > args.n {
    return Err("nan_count + inf_count must not exceed N".to_string());
  }
  if args.low >= args.high {
    return Err("low must be less than high".to_string());
  }
  if args.window <= 1 || args.window > args.n {
    return Err("window must be in 2..=N".to_string());
  }
  if args.step == 0 {
    return Err("step must be nonzero".to_string());
  }
  Ok(())
}

fn generate_input(args: &Args, rng: &mut StdRng) -> Vec<f64> {
  let mut input: Vec<f64> = (0..args.n).map(|_| rng.gen_range(args.low..args.high)).collect();

  let mut positions: Vec<usize> = (0..args.n).collect();
  positions.shuffle(rng);

  let mut cursor = 0;
  for _ in 0..args.nan_count {
    input[positions[cursor]] = f64::NAN;
    cursor += 1;
  }

  let pos_inf_count = args.inf_count / 2;
  let neg_inf_count = args.inf_count - pos_inf_count;
  for _ in 0..pos_inf_count {
    input[positions[cursor]] = f64::INFINITY;
    cursor += 1;
  }
  for _ in 0..neg_inf_count {
    input[positions[cursor]] = f64::NEG_INFINITY;
    cursor += 1;
  }

  input
}
