//! The fibunacci recurrence: `f(0) = 1`, `f(1) = 1`, `f(n) = f(n-1) + f(n-2)`.
//!
//! Both base cases are 1, so `f(n)` is the classical `F(n+1)`.

use serde::{Deserialize, Serialize};

use crate::{FibunacciError, Result};

/// Largest step count whose term still fits in an `i64`.
pub const MAX_STEP: i64 = 91;

/// Steps the test sequence is checked against by default.
pub const DEFAULT_STEPS: [i64; 7] = [0, 1, 2, 3, 4, 5, 10];

pub trait Evaluator {
    fn name(&self) -> &'static str;

    fn evaluate(&self, n: i64) -> Result<i64>;
}

/// Naive double recursion. Exponential in `n`, kept as the reference path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recursive;

/// Single pass over the sequence, O(n) time and O(1) space.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iterative;

impl Evaluator for Recursive {
    fn name(&self) -> &'static str {
        "recursive"
    }

    fn evaluate(&self, n: i64) -> Result<i64> {
        let n = check_step(n)?;
        Ok(recurse(n))
    }
}

impl Evaluator for Iterative {
    fn name(&self) -> &'static str {
        "iterative"
    }

    fn evaluate(&self, n: i64) -> Result<i64> {
        let n = check_step(n)?;

        let (mut prev, mut current) = (1i64, 1i64);
        for _ in 1..n {
            let next = prev + current;
            prev = current;
            current = next;
        }

        Ok(current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Recursive,
    Iterative,
}

impl Strategy {
    pub fn evaluator(&self) -> &'static dyn Evaluator {
        match self {
            Strategy::Recursive => &Recursive,
            Strategy::Iterative => &Iterative,
        }
    }

    pub fn evaluate(&self, n: i64) -> Result<i64> {
        self.evaluator().evaluate(n)
    }
}

/// Canonical entry point.
pub fn fibunacci(n: i64) -> Result<i64> {
    Recursive.evaluate(n)
}

/// Same results as [`fibunacci`] without the exponential cost.
pub fn fibunacci_fast(n: i64) -> Result<i64> {
    Iterative.evaluate(n)
}

/// Terms `f(0)..f(count - 1)`.
pub fn sequence(strategy: Strategy, count: usize) -> Result<Vec<i64>> {
    let count = i64::try_from(count).map_err(|_| {
        FibunacciError::InvalidArgument(format!("sequence length {count} is out of range"))
    })?;

    (0..count).map(|n| strategy.evaluate(n)).collect()
}

fn check_step(n: i64) -> Result<u32> {
    if n < 0 {
        return Err(FibunacciError::InvalidArgument(format!(
            "step count must be non-negative, got {n}"
        )));
    }

    if n > MAX_STEP {
        return Err(FibunacciError::InvalidArgument(format!(
            "step count {n} overflows a 64-bit term (max {MAX_STEP})"
        )));
    }

    Ok(n as u32)
}

fn recurse(n: u32) -> i64 {
    if n <= 1 {
        1
    } else {
        recurse(n - 1) + recurse(n - 2)
    }
}
