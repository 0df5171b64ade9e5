//! Counting and binary semaphore safety, including the producer/consumer
//! end-to-end scenario. Every test here uses `try_wait` rather than `wait`
//! so a semaphore that happens to be empty fails the assertion instead of
//! blocking on a scheduler bridge this harness never registers.

use rtos_abi::KernelError;
use rtos_sync::{BinarySemaphore, Semaphore};
use rtos_lib::{fail, pass, test_suite};
use rtos_lib::testing::TestResult;

fn test_post_then_wait_leaves_value_unchanged() -> TestResult {
    let sem = Semaphore::new(3);
    sem.post().unwrap();
    sem.try_wait().unwrap();
    if sem.get_value() != 3 {
        return fail!("value was {} after a balanced post/wait pair, expected 3", sem.get_value());
    }
    pass!()
}

fn test_interleaved_post_wait_preserves_accounting() -> TestResult {
    let sem = Semaphore::new(0);
    let mut successful_waits = 0u32;
    let mut posts = 0u32;
    for op in [true, true, false, true, false, false, true] {
        if op {
            sem.post().unwrap();
            posts += 1;
        } else if sem.try_wait().is_ok() {
            successful_waits += 1;
        }
    }
    let expected = posts - successful_waits;
    if sem.get_value() != expected {
        return fail!("value {} != initial(0) + posts({}) - waits({})", sem.get_value(), posts, successful_waits);
    }
    pass!()
}

fn test_try_wait_on_empty_returns_again() -> TestResult {
    let sem = Semaphore::new(0);
    match sem.try_wait() {
        Err(KernelError::Again) => pass!(),
        Err(other) => fail!("expected Again on an empty semaphore, got {:?}", other),
        Ok(()) => fail!("try_wait succeeded on a semaphore with value 0"),
    }
}

fn test_binary_semaphore_post_is_idempotent() -> TestResult {
    let sem = BinarySemaphore::new(false);
    sem.post().unwrap();
    sem.post().unwrap();
    sem.post().unwrap();
    if !sem.get_value() {
        return fail!("binary semaphore did not end up set after three posts");
    }
    // A single wait must drain it back to cleared regardless of how many
    // posts preceded it — `post` sets, it does not accumulate.
    sem.try_wait().unwrap();
    if sem.get_value() {
        return fail!("binary semaphore stayed set after a single wait");
    }
    if sem.try_wait().is_ok() {
        return fail!("a second wait succeeded on an already-cleared binary semaphore");
    }
    pass!()
}

/// Producer/consumer with a counting semaphore initialized to zero: the
/// producer posts 5 times, the consumer waits 5 times and observes exactly
/// 5 wakeups, then its 6th wait would block.
fn test_producer_consumer_five_posts_five_waits() -> TestResult {
    let sem = Semaphore::new(0);
    for _ in 0..5 {
        sem.post().unwrap();
    }
    let mut observed = 0;
    for _ in 0..5 {
        if sem.try_wait().is_ok() {
            observed += 1;
        }
    }
    if observed != 5 {
        return fail!("consumer observed {} wakeups, expected 5", observed);
    }
    match sem.try_wait() {
        Err(KernelError::Again) => pass!(),
        _ => fail!("a 6th wait did not find the semaphore empty"),
    }
}

test_suite!(
    semaphore_suite,
    [
        test_post_then_wait_leaves_value_unchanged,
        test_interleaved_post_wait_preserves_accounting,
        test_try_wait_on_empty_returns_again,
        test_binary_semaphore_post_is_idempotent,
        test_producer_consumer_five_posts_five_waits,
    ]
);
