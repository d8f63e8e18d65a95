//! Native module exposing the fibunacci recurrence (`f(0) = f(1) = 1`) over a
//! C ABI, together with the in-process evaluator it is checked against.

use thiserror::Error;

pub mod config;
pub mod ffi;
#[cfg(not(target_os = "windows"))]
pub mod loader;
pub mod recurrence;

pub use config::{default_library_path, HarnessConfig};
#[cfg(not(target_os = "windows"))]
pub use loader::{check_parity, run_harness, NativeModule, ParityRecord};
pub use recurrence::{
    fibunacci, fibunacci_fast, sequence, Evaluator, Iterative, Recursive, Strategy, MAX_STEP,
};

#[derive(Error, Debug)]
pub enum FibunacciError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid module: {0}")]
    InvalidModule(String),

    #[cfg(not(target_os = "windows"))]
    #[error("Library error: {0}")]
    Library(#[from] libloading::Error),

    #[error("ABI version mismatch: expected {expected}, found {actual}")]
    AbiMismatch { expected: u32, actual: u32 },

    #[error("Parity mismatch at step {step}: expected {expected}, native module returned {actual}")]
    Mismatch {
        step: i64,
        expected: i64,
        actual: i64,
    },
}

pub type Result<T> = std::result::Result<T, FibunacciError>;
