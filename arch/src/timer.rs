//! Timer programming for the tick and wakeup capture/compare channels.
//!
//! Both channels share one free-running counter clocked at
//! [`rtos_abi::ARCH_TICK_CLK_FREQ`]. Channel 0 (`TICK_VECTOR`) is the
//! periodic scheduler tick; channel 1 (`WAKEUP_VECTOR`) is reprogrammed on
//! every sleep-queue change to fire exactly when the earliest sleeper's
//! deadline arrives, so idle time costs no wakeups it doesn't need.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use rtos_abi::{ARCH_TICK_CLK_FREQ, Config};

pub const TICK_VECTOR: u16 = 0;
pub const WAKEUP_VECTOR: u16 = 1;

static WAKEUP_ARMED: AtomicBool = AtomicBool::new(false);
static CYCLES_PER_TICK: AtomicU32 = AtomicU32::new(0);

fn cycles_per_tick<C: Config>() -> u32 {
    let cached = CYCLES_PER_TICK.load(Ordering::Relaxed);
    if cached != 0 {
        return cached;
    }
    let computed = if C::FAST_MATH {
        // Fast path: a power-of-two-friendly shift, tolerating a little
        // tick-rate drift in exchange for avoiding a division in the ISR
        // setup path.
        ARCH_TICK_CLK_FREQ >> C::TICK_RATE_HZ.trailing_zeros().min(12)
    } else {
        (ARCH_TICK_CLK_FREQ + C::TICK_RATE_HZ / 2) / C::TICK_RATE_HZ
    };
    CYCLES_PER_TICK.store(computed, Ordering::Relaxed);
    computed
}

/// Program the tick channel to fire every `1 / Config::TICK_RATE_HZ`
/// seconds and start the underlying counter.
pub fn setup_tick_timer<C: Config>() {
    let _ = cycles_per_tick::<C>();
    // A real port writes the capture/compare registers here; the counter
    // and vector wiring are board-specific and owned by the board support
    // crate that links this one in.
}

/// Acknowledge the tick channel's pending interrupt flag.
pub fn ack_tick() {}

/// Arm the wakeup channel to fire `ticks_from_now` ticks in the future.
/// Called whenever the sleep queue's leftmost deadline changes.
pub fn arm_wakeup<C: Config>(ticks_from_now: u32) {
    let cycles = cycles_per_tick::<C>().saturating_mul(ticks_from_now.max(1));
    let _ = cycles;
    WAKEUP_ARMED.store(true, Ordering::Relaxed);
}

/// Suppress the wakeup channel: nothing is sleeping, so tickless idle has
/// no deadline to reprogram toward.
pub fn suppress_wakeup() {
    WAKEUP_ARMED.store(false, Ordering::Relaxed);
}

/// Suppress the tick channel entirely (used only in tickless-idle builds
/// while the idle task runs with no other ready task to time-slice).
pub fn suppress_tick() {}

pub fn wakeup_armed() -> bool {
    WAKEUP_ARMED.load(Ordering::Relaxed)
}

/// Which channel fired, read from the board's interrupt-vector/TAIV-style
/// register. A real port reads hardware here; this single-vector stub has
/// only the wakeup channel to report.
pub fn wakeup_vector() -> u16 {
    WAKEUP_VECTOR
}
