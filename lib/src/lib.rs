#![no_std]

pub mod init_flag;
pub mod klog;
pub mod spinlock;
pub mod testing;

pub use init_flag::{InitFlag, StateFlag};
pub use klog::{KlogLevel, LogSink, attach_sink as klog_attach_sink, get_level as klog_get_level, is_enabled as klog_is_enabled, set_level as klog_set_level};
pub use spinlock::{IrqMutex, IrqMutexGuard, Spinlock, SpinlockGuard};
pub use testing::{SuiteResults, TestCase, TestResult, run_suite};
