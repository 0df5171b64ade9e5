//! Arch-neutral ABI for the kernel core.
//!
//! Collects the types every other core crate needs but none of them should
//! own: the error/panic taxonomy, compile-time configuration, and the trait
//! interfaces that let `rtos-sched` and `rtos-sync` register themselves with
//! `rtos-kernel` without a circular dependency.

#![no_std]

pub mod config;
pub mod error;
pub mod panic_hook;
pub mod sched_traits;
pub mod service_cell;

pub use config::*;
pub use error::*;
pub use panic_hook::{PanicHook, kernel_panic, register_panic_hook};
pub use sched_traits::*;
pub use service_cell::ServiceCell;
