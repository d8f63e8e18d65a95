//! C ABI exported by the `cdylib`.
//!
//! Every entry point writes its term through `out` and reports a status code,
//! so a host can tell an invalid step apart from a legitimate term.

use std::os::raw::c_int;

use crate::recurrence::{self, Strategy, MAX_STEP};
use crate::{FibunacciError, Result};

pub const ABI_VERSION: u32 = 1;

pub const STATUS_OK: c_int = 0;
pub const STATUS_INVALID_ARGUMENT: c_int = 1;
pub const STATUS_NULL_OUTPUT: c_int = 2;

impl Strategy {
    /// Exported symbol backing this strategy, nul-terminated for symbol lookup.
    pub fn symbol(&self) -> &'static [u8] {
        match self {
            Strategy::Recursive => b"fibunacci\0",
            Strategy::Iterative => b"fibunacci_fast\0",
        }
    }
}

/// # Safety
///
/// `out` must be null or valid for a write of one `i64`.
#[no_mangle]
pub unsafe extern "C" fn fibunacci(n: i64, out: *mut i64) -> c_int {
    write_result(recurrence::fibunacci(n), out)
}

/// # Safety
///
/// `out` must be null or valid for a write of one `i64`.
#[no_mangle]
pub unsafe extern "C" fn fibunacci_fast(n: i64, out: *mut i64) -> c_int {
    write_result(recurrence::fibunacci_fast(n), out)
}

#[no_mangle]
pub extern "C" fn fibunacci_max_step() -> i64 {
    MAX_STEP
}

#[no_mangle]
pub extern "C" fn fibunacci_abi_version() -> u32 {
    ABI_VERSION
}

/// Maps a status returned by one of the exports back onto a `Result`.
pub fn status_to_result(status: c_int, n: i64, value: i64) -> Result<i64> {
    match status {
        STATUS_OK => Ok(value),
        STATUS_INVALID_ARGUMENT => Err(FibunacciError::InvalidArgument(format!(
            "native module rejected step count {n}"
        ))),
        STATUS_NULL_OUTPUT => Err(FibunacciError::InvalidModule(
            "native module reported a null output pointer".to_string(),
        )),
        other => Err(FibunacciError::InvalidModule(format!(
            "native module returned unknown status {other}"
        ))),
    }
}

unsafe fn write_result(result: Result<i64>, out: *mut i64) -> c_int {
    if out.is_null() {
        return STATUS_NULL_OUTPUT;
    }

    match result {
        Ok(term) => {
            *out = term;
            STATUS_OK
        }
        Err(_) => STATUS_INVALID_ARGUMENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_exports_write_term() {
        let mut out = 0i64;

        assert_eq!(unsafe { fibunacci(10, &mut out) }, STATUS_OK);
        assert_eq!(out, 89);

        assert_eq!(unsafe { fibunacci_fast(5, &mut out) }, STATUS_OK);
        assert_eq!(out, 8);
    }

    #[test]
    fn test_invalid_step_leaves_output_untouched() {
        let mut out = -7i64;

        assert_eq!(unsafe { fibunacci(-3, &mut out) }, STATUS_INVALID_ARGUMENT);
        assert_eq!(
            unsafe { fibunacci_fast(MAX_STEP + 1, &mut out) },
            STATUS_INVALID_ARGUMENT
        );
        assert_eq!(out, -7);
    }

    #[test]
    fn test_null_output() {
        assert_eq!(unsafe { fibunacci(3, ptr::null_mut()) }, STATUS_NULL_OUTPUT);
        assert_eq!(
            unsafe { fibunacci_fast(3, ptr::null_mut()) },
            STATUS_NULL_OUTPUT
        );
    }

    #[test]
    fn test_metadata_exports() {
        assert_eq!(fibunacci_max_step(), MAX_STEP);
        assert_eq!(fibunacci_abi_version(), ABI_VERSION);
    }

    #[test]
    fn test_status_to_result() {
        assert_eq!(status_to_result(STATUS_OK, 4, 5).unwrap(), 5);
        assert!(matches!(
            status_to_result(STATUS_INVALID_ARGUMENT, -1, 0),
            Err(FibunacciError::InvalidArgument(_))
        ));
        assert!(matches!(
            status_to_result(STATUS_NULL_OUTPUT, 1, 0),
            Err(FibunacciError::InvalidModule(_))
        ));
        assert!(matches!(
            status_to_result(42, 1, 0),
            Err(FibunacciError::InvalidModule(_))
        ));
    }

    #[test]
    fn test_strategy_symbols_are_nul_terminated() {
        assert_eq!(Strategy::Recursive.symbol(), b"fibunacci\0");
        assert_eq!(Strategy::Iterative.symbol(), b"fibunacci_fast\0");
    }
}
