//! Loads the built `cdylib` and checks it against the in-process evaluator.

use libloading::{Library, Symbol};
use std::os::raw::c_int;
use std::path::{Path, PathBuf};

use crate::config::HarnessConfig;
use crate::ffi::{self, ABI_VERSION};
use crate::recurrence::Strategy;
use crate::{FibunacciError, Result};

type StepFn = unsafe extern "C" fn(i64, *mut i64) -> c_int;
type MaxStepFn = unsafe extern "C" fn() -> i64;
type AbiVersionFn = unsafe extern "C" fn() -> u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParityRecord {
    pub step: i64,
    pub expected: i64,
    pub actual: i64,
}

pub struct NativeModule {
    library: Library,
    path: PathBuf,
}

impl NativeModule {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FibunacciError::InvalidModule(format!(
                "{} does not exist",
                path.display()
            )));
        }

        // Runs the library's initialisers.
        let library = unsafe { Library::new(path) }?;
        let module = Self {
            library,
            path: path.to_path_buf(),
        };

        let abi_version = module.abi_version()?;
        if abi_version != ABI_VERSION {
            return Err(FibunacciError::AbiMismatch {
                expected: ABI_VERSION,
                actual: abi_version,
            });
        }

        log::debug!(
            "Loaded native module {} (ABI v{})",
            module.path.display(),
            abi_version
        );
        Ok(module)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn abi_version(&self) -> Result<u32> {
        let func: Symbol<AbiVersionFn> = unsafe { self.library.get(b"fibunacci_abi_version\0") }?;
        Ok(unsafe { func() })
    }

    pub fn max_step(&self) -> Result<i64> {
        let func: Symbol<MaxStepFn> = unsafe { self.library.get(b"fibunacci_max_step\0") }?;
        Ok(unsafe { func() })
    }

    pub fn call(&self, strategy: Strategy, n: i64) -> Result<i64> {
        let func: Symbol<StepFn> = unsafe { self.library.get(strategy.symbol()) }?;

        let mut out = 0i64;
        let status = unsafe { func(n, &mut out) };
        ffi::status_to_result(status, n, out)
    }
}

/// Evaluates every step natively and in-process, failing on the first disagreement.
pub fn check_parity(
    module: &NativeModule,
    strategy: Strategy,
    steps: &[i64],
) -> Result<Vec<ParityRecord>> {
    let mut records = Vec::with_capacity(steps.len());

    for &step in steps {
        let expected = strategy.evaluate(step)?;
        let actual = module.call(strategy, step)?;
        log::debug!("f({step}) = {actual} (expected {expected})");

        if expected != actual {
            return Err(FibunacciError::Mismatch {
                step,
                expected,
                actual,
            });
        }

        records.push(ParityRecord {
            step,
            expected,
            actual,
        });
    }

    Ok(records)
}

pub fn run_harness(config: &HarnessConfig) -> Result<Vec<ParityRecord>> {
    config.validate()?;

    let module = NativeModule::open(&config.library_path)?;
    let records = check_parity(&module, config.strategy, &config.steps)?;

    log::info!(
        "{} steps agree between {} and the {} evaluator",
        records.len(),
        module.path().display(),
        config.strategy.evaluator().name()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_library() {
        match NativeModule::open("/nonexistent/libfibunacci.so") {
            Err(FibunacciError::InvalidModule(msg)) => assert!(msg.contains("does not exist")),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("missing library should not load"),
        }
    }

    #[test]
    fn test_run_harness_validates_first() {
        let mut config = HarnessConfig::new("/nonexistent/libfibunacci.so");
        config.steps = vec![-1];

        assert!(matches!(
            run_harness(&config),
            Err(FibunacciError::InvalidConfig(_))
        ));
    }
}
