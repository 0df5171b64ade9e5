//! Test execution and result collection.

use super::{FixtureKind, TestCase, TestResult};
use crate::klog_info;

#[derive(Clone, Copy, Debug, Default)]
pub struct SuiteResults {
    pub name: &'static str,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub panicked: u32,
    pub skipped: u32,
    pub elapsed_ticks: u32,
}

impl SuiteResults {
    pub fn new(name: &'static str) -> Self {
        Self { name, ..Default::default() }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.panicked == 0
    }

    pub fn to_tuple(&self) -> (u32, u32) {
        (self.passed, self.total)
    }
}

/// Runs one test. There is no panic-recovery here: a test that panics takes
/// the whole harness down with it, the same as any other kernel panic. Tests
/// report failure through their return value instead.
pub fn run_single_test(_name: &str, test_fn: fn() -> TestResult, _fixture: FixtureKind) -> TestResult {
    test_fn()
}

pub fn run_suite(name: &'static str, tests: &[TestCase]) -> SuiteResults {
    let start = rtos_arch::time_now();
    let mut results = SuiteResults::new(name);
    results.total = tests.len() as u32;

    for test in tests {
        let result = run_single_test(test.name, test.func, test.fixture);
        match result {
            TestResult::Pass => results.passed += 1,
            TestResult::Fail => results.failed += 1,
            TestResult::Panic => results.panicked += 1,
            TestResult::Skipped => results.skipped += 1,
        }
    }

    results.elapsed_ticks = rtos_arch::time_now().wrapping_sub(start);

    klog_info!(
        "SUITE {}: {}/{} passed ({} ticks)",
        name,
        results.passed,
        results.total,
        results.elapsed_ticks
    );

    results
}
