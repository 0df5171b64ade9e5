//! One suite per component plus the §8 end-to-end scenarios, registered the
//! way `slopos-tests` registers `sched_tests`/`context_tests`: each module
//! exposes a `test_suite!`-generated entry point, and [`run_all`] drives
//! them in turn and folds the results into one summary.

#![no_std]

pub mod condvar_tests;
pub mod mutex_tests;
pub mod policy_tests;
pub mod rbtree_tests;
pub mod semaphore_tests;
pub mod sleep_queue_tests;

use rtos_lib::{SuiteResults, klog_info};

pub const SUITE_COUNT: usize = 8;

/// Runs every registered suite in turn and logs a one-line summary for
/// each, the same format `slopos-tests` prints per `SUITE{n}`.
pub fn run_all() -> [SuiteResults; SUITE_COUNT] {
    let results = [
        rbtree_tests::rbtree_suite(),
        sleep_queue_tests::sleep_queue_suite(),
        policy_tests::policy_suite(),
        scheduler_tests::scheduler_suite(),
        semaphore_tests::semaphore_suite(),
        mutex_tests::mutex_suite(),
        condvar_tests::condvar_suite(),
        scenarios::scenario_suite(),
    ];

    let total: u32 = results.iter().map(|r| r.total).sum();
    let passed: u32 = results.iter().map(|r| r.passed).sum();
    let failed: u32 = results.iter().map(|r| r.failed).sum();
    klog_info!("TESTS SUMMARY: {}/{} passed, {} failed", passed, total, failed);

    results
}

/// `true` iff every suite passed with nothing failed or panicked.
pub fn run_all_pass() -> bool {
    run_all().iter().all(SuiteResults::all_passed)
}
