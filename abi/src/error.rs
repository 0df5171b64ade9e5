//! Error and panic taxonomy shared across the kernel core.

use core::ffi::c_int;

/// Implements the conversions every kernel status enum needs.
///
/// Generates `as_c_int()`/`from_c_int()` for the rare boundary that still
/// speaks C return codes (the tick/wakeup ISR dispatch table), plus
/// `is_success()`/`is_error()`. The public API itself returns `Result`, not
/// these raw codes; this macro exists for that one FFI seam.
macro_rules! impl_kernel_error {
    ($ty:ty, fallback: $fallback:ident, variants: { $($val:literal => $variant:ident),* $(,)? }) => {
        impl $ty {
            #[inline]
            pub fn as_c_int(self) -> c_int {
                self as c_int
            }

            #[inline]
            pub fn from_c_int(val: c_int) -> Self {
                match val {
                    $($val => Self::$variant,)*
                    _ => Self::$fallback,
                }
            }

            #[inline]
            pub fn is_success(self) -> bool {
                matches!(self, Self::Success)
            }

            #[inline]
            pub fn is_error(self) -> bool {
                !self.is_success()
            }
        }
    };
}

/// Result type returned by the public scheduler/sync API.
pub type KernelResult<T> = Result<T, KernelError>;

/// Status taxonomy for the scheduler and synchronization primitives.
///
/// Mirrors the C11 `thrd_*` return codes plus the errno-style misuse codes
/// the original's semaphore/mutex layer reported through a separate
/// out-parameter.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelError {
    #[default]
    Success = 0,
    /// Allocation/slot exhaustion (task table full, arena full).
    NoMem = 1,
    /// A timed wait expired before the condition was met.
    TimedOut = 2,
    /// A non-blocking call found the resource unavailable.
    Busy = 3,
    /// Unspecified internal error.
    Error = 4,
    /// Caller passed a value outside the accepted domain (errno EINVAL).
    InvalidArgument = 5,
    /// Operation would need to block but was asked not to (errno EAGAIN).
    Again = 6,
    /// Feature accepted at construction but not implemented (recursive or
    /// timed mutexes: the type tag is stored, the behavior is rejected).
    NotSupported = 7,
}

impl_kernel_error!(KernelError, fallback: Error, variants: {
    0 => Success,
    1 => NoMem,
    2 => TimedOut,
    3 => Busy,
    4 => Error,
    5 => InvalidArgument,
    6 => Again,
    7 => NotSupported,
});

/// Codes passed to `panic()`, distinguishing the kind of invariant violation
/// from an ordinary recoverable error.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicCode {
    /// Reached code that should be unreachable.
    Undefined = 0,
    /// Stack smashing / canary corruption detected.
    Ssp = 1,
    /// An internal `assert!`-style invariant failed.
    AssertFail = 2,
    /// An internal `expect!`-style invariant failed with a carried value.
    ExpectFail = 3,
    /// Generic unrecoverable error reported by a driver or subsystem.
    GeneralError = 4,
    /// Requests a controlled warm reboot (debug builds still halt).
    SoftReboot = 5,
    /// Requests an immediate hard reset.
    HardReboot = 6,
}
