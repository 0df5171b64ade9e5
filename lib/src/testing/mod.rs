//! In-target test harness.
//!
//! There is no `#[test]`/`cargo test` here — every test runs on the actual
//! target (or under an instruction-set simulator), so suites are plain
//! functions collected into a [`TestCase`] table and driven by [`run_suite`].
//!
//! ```ignore
//! use rtos_lib::testing::{TestResult, pass, fail};
//!
//! pub fn test_something() -> TestResult {
//!     if some_condition {
//!         return fail!("condition not met");
//!     }
//!     pass!()
//! }
//! ```

use core::ffi::c_int;

mod fixture;
mod runner;

pub use fixture::{FixtureKind, NoFixture, TestFixture};
pub use runner::{SuiteResults, run_single_test, run_suite};

/// Result of a single test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
    Panic,
    Skipped,
}

impl TestResult {
    #[inline]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail | Self::Panic)
    }

    #[inline]
    pub fn from_c_int(val: c_int) -> Self {
        if val == 0 { Self::Pass } else { Self::Fail }
    }

    #[inline]
    pub fn to_c_int(self) -> c_int {
        match self {
            Self::Pass | Self::Skipped => 0,
            Self::Fail | Self::Panic => -1,
        }
    }
}

impl From<i32> for TestResult {
    fn from(val: i32) -> Self {
        Self::from_c_int(val as c_int)
    }
}

impl From<TestResult> for c_int {
    fn from(val: TestResult) -> Self {
        val.to_c_int()
    }
}

/// Metadata for a single test case.
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
    pub fixture: FixtureKind,
}

#[macro_export]
macro_rules! pass {
    () => {
        $crate::testing::TestResult::Pass
    };
}

#[macro_export]
macro_rules! fail {
    () => {
        $crate::testing::TestResult::Fail
    };
    ($msg:expr) => {{
        $crate::klog_error!("test failed: {}", $msg);
        $crate::testing::TestResult::Fail
    }};
    ($fmt:expr, $($arg:tt)*) => {{
        $crate::klog_error!(concat!("test failed: ", $fmt), $($arg)*);
        $crate::testing::TestResult::Fail
    }};
}

/// Run a single test with optional fixture.
///
/// ```ignore
/// run_test!(test_function)
/// run_test!("custom name", test_function)
/// run_test!(test_function, SchedulerFixture)
/// run_test!(passed, total, test_function)
/// ```
#[macro_export]
macro_rules! run_test {
    ($passed:expr, $total:expr, $test_fn:expr) => {{
        $total += 1;
        let result = $crate::testing::run_single_test(
            stringify!($test_fn),
            || $test_fn().into(),
            $crate::testing::FixtureKind::None,
        );
        if result.is_pass() {
            $passed += 1;
        }
        result
    }};

    ($passed:expr, $total:expr, $test_fn:expr, $fixture:ty) => {{
        $total += 1;
        let result = $crate::testing::run_single_test(
            stringify!($test_fn),
            || $test_fn().into(),
            <$fixture as $crate::testing::TestFixture>::KIND,
        );
        if result.is_pass() {
            $passed += 1;
        }
        result
    }};

    ($test_fn:expr) => {{
        $crate::testing::run_single_test(
            stringify!($test_fn),
            || $test_fn().into(),
            $crate::testing::FixtureKind::None,
        )
    }};

    ($test_fn:expr, $fixture:ty) => {{
        $crate::testing::run_single_test(
            stringify!($test_fn),
            || $test_fn().into(),
            <$fixture as $crate::testing::TestFixture>::KIND,
        )
    }};

    ($name:expr, $test_fn:expr) => {{
        $crate::testing::run_single_test(
            $name,
            || $test_fn().into(),
            $crate::testing::FixtureKind::None,
        )
    }};

    ($name:expr, $test_fn:expr, $fixture:ty) => {{
        $crate::testing::run_single_test(
            $name,
            || $test_fn().into(),
            <$fixture as $crate::testing::TestFixture>::KIND,
        )
    }};
}

/// Declare a test suite with automatic result collection.
///
/// ```ignore
/// test_suite!(rbtree_suite, [test_insert_find, test_delete_rebalances]);
/// test_suite!(scheduler_suite, SchedulerFixture, [test_round_robin_fairness]);
/// ```
#[macro_export]
macro_rules! test_suite {
    ($name:ident, [$($test:ident),* $(,)?]) => {
        pub fn $name() -> $crate::testing::SuiteResults {
            let tests: &[$crate::testing::TestCase] = &[
                $(
                    $crate::testing::TestCase {
                        name: stringify!($test),
                        func: || $test().into(),
                        fixture: $crate::testing::FixtureKind::None,
                    },
                )*
            ];
            $crate::testing::run_suite(stringify!($name), tests)
        }
    };

    ($name:ident, $fixture:ty, [$($test:ident),* $(,)?]) => {
        pub fn $name() -> $crate::testing::SuiteResults {
            let tests: &[$crate::testing::TestCase] = &[
                $(
                    $crate::testing::TestCase {
                        name: stringify!($test),
                        func: || $test().into(),
                        fixture: <$fixture as $crate::testing::TestFixture>::KIND,
                    },
                )*
            ];
            $crate::testing::run_suite(stringify!($name), tests)
        }
    };
}
