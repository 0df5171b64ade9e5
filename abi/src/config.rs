//! Compile-time configuration.
//!
//! Rendered as `const` items behind a `Config` trait, rather than the
//! preprocessor `#define`s of `port_config.h`, so a board crate can override
//! any subset by implementing the trait instead of editing this file.

/// Knobs a board support crate can tune. `DefaultConfig` below gives the
/// values `port_config.h` shipped with.
pub trait Config {
    /// Scheduler tick frequency in Hz.
    const TICK_RATE_HZ: u32 = 100;
    /// Enable tickless idle: the timer is reprogrammed for the next sleep
    /// wakeup instead of firing unconditionally every tick.
    const TICKLESS_IDLE: bool = true;
    /// Maximum number of task control blocks.
    const MAX_TASKS: usize = 16;
    /// Default per-task stack size, in 16-bit words.
    const TASK_STACK_WORDS: usize = 128;
    /// ISR stack size, in 16-bit words.
    const ISR_STACK_WORDS: usize = 128;
    /// Idle task stack size, in 16-bit words.
    const IDLE_STACK_WORDS: usize = 64;
    /// Enable the stack-overflow check hook on every context switch.
    const CHECK_STACK_OVERFLOW: bool = false;
    /// Debug builds halt (LPM) on panic; release builds reset.
    const DEBUG_MODE: bool = true;
    /// Use the fast (shift-based) tick-to-cycle conversion instead of the
    /// precise rounding division.
    const FAST_MATH: bool = true;
    /// Enable the watchdog monitor hook (fed once per scheduler pass).
    const WATCHDOG_MONITOR: bool = false;
    /// Size in bytes of the panic dump ring buffer.
    const PANIC_DUMP_SIZE: usize = 128;
}

/// The configuration `port_config.h` shipped with.
pub struct DefaultConfig;
impl Config for DefaultConfig {}

/// Hardware timer clock feeding the tick/wakeup capture-compare channels.
pub const ARCH_TICK_CLK_FREQ: u32 = 4096;
