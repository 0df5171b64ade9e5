//! Level-filtered kernel logging over a pluggable byte sink.
//!
//! The board support crate that links this one in owns the actual UART (or
//! whatever other data-out channel the target has) and registers it once at
//! boot via [`attach_sink`]. Until a sink is registered, every log call is a
//! cheap no-op rather than a crash.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicU8, Ordering};

use rtos_abi::ServiceCell;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum KlogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl KlogLevel {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => KlogLevel::Error,
            1 => KlogLevel::Warn,
            2 => KlogLevel::Info,
            3 => KlogLevel::Debug,
            _ => KlogLevel::Trace,
        }
    }
}

/// A destination for log bytes. Typically a UART wrapped in an
/// [`crate::IrqMutex`] so concurrent callers serialize cleanly.
pub trait LogSink: Send + Sync {
    fn write_byte(&self, b: u8);

    fn write_bytes(&self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }
}

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(KlogLevel::Info as u8);
static SINK: ServiceCell<&'static dyn LogSink> = ServiceCell::new("klog_sink");

/// Register the byte sink logging writes to. Call once at boot.
pub fn attach_sink(sink: &'static &'static dyn LogSink) {
    SINK.register(sink);
}

pub fn set_level(level: KlogLevel) {
    CURRENT_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn get_level() -> KlogLevel {
    KlogLevel::from_raw(CURRENT_LEVEL.load(Ordering::Relaxed))
}

#[inline(always)]
pub fn is_enabled(level: KlogLevel) -> bool {
    (level as u8) <= CURRENT_LEVEL.load(Ordering::Relaxed)
}

struct SinkWriter<'a>(&'a dyn LogSink);

impl Write for SinkWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_bytes(s.as_bytes());
        Ok(())
    }
}

/// Format and emit one log line if `level` is enabled and a sink is
/// registered. Used by the `klog_*!` macros; not normally called directly.
pub fn log_line(level: KlogLevel, prefix: &str, args: fmt::Arguments<'_>) {
    if !is_enabled(level) {
        return;
    }
    let Some(sink) = SINK.try_get() else { return };
    let mut writer = SinkWriter(*sink);
    let _ = writer.write_str(prefix);
    let _ = writer.write_fmt(args);
    let _ = writer.write_str("\n");
}

#[macro_export]
macro_rules! klog_error {
    ($($arg:tt)*) => {
        $crate::klog::log_line($crate::klog::KlogLevel::Error, "[ERROR] ", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_warn {
    ($($arg:tt)*) => {
        $crate::klog::log_line($crate::klog::KlogLevel::Warn, "[WARN]  ", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_info {
    ($($arg:tt)*) => {
        $crate::klog::log_line($crate::klog::KlogLevel::Info, "[INFO]  ", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_debug {
    ($($arg:tt)*) => {
        $crate::klog::log_line($crate::klog::KlogLevel::Debug, "[DEBUG] ", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_trace {
    ($($arg:tt)*) => {
        $crate::klog::log_line($crate::klog::KlogLevel::Trace, "[TRACE] ", format_args!($($arg)*))
    };
}
