//! Compile-time configuration. A board support package overrides whichever
//! subset of `Config`'s defaults it needs by defining its own zero-sized
//! type and implementing the trait over it instead of using
//! [`KernelConfig`] — the Rust analogue of `original_source/port_config.h`
//! being `#include`d differently per board.

use rtos_abi::Config;

pub struct KernelConfig;

impl Config for KernelConfig {}

/// Task table size. Rust stable can't use `Config::MAX_TASKS` directly as a
/// const generic argument, so the scheduler's array length is this literal
/// instead; [`assert_config_consistent`] catches the two drifting apart.
pub const TASK_SLOTS: usize = 16;

pub fn assert_config_consistent() {
    debug_assert_eq!(
        TASK_SLOTS,
        KernelConfig::MAX_TASKS,
        "TASK_SLOTS must match KernelConfig::MAX_TASKS"
    );
}
