//! Sleep-queue wake-time ordering and the sleep-sort end-to-end scenario.

use rtos_sched::SleepQueue;
use rtos_lib::{fail, pass, test_suite};
use rtos_lib::testing::TestResult;

fn test_peek_returns_minimum() -> TestResult {
    let mut q: SleepQueue<16> = SleepQueue::new();
    q.push(1, 500);
    q.push(2, 100);
    q.push(3, 300);
    match q.peek() {
        Some(e) if e.wake_time == 100 && e.task == 2 => pass!(),
        Some(e) => fail!("peek returned wake_time={} task={}, expected (100, 2)", e.wake_time, e.task),
        None => fail!("peek returned None on a non-empty queue"),
    }
}

fn test_pop_drains_in_nondecreasing_wake_order() -> TestResult {
    let mut q: SleepQueue<16> = SleepQueue::new();
    let durations = [30u32, 10, 20, 40];
    for (id, d) in durations.iter().enumerate() {
        q.push(id as u16, *d);
    }
    let mut order = [0u16; 4];
    for slot in order.iter_mut() {
        *slot = q.pop().unwrap().task;
    }
    // sleep-sort scenario: durations {30,10,20,40} for tasks {0,1,2,3} wake
    // in order 1 (10), 2 (20), 0 (30), 3 (40).
    if order != [1, 2, 0, 3] {
        return fail!("pop order was {:?}, expected [1, 2, 0, 3]", order);
    }
    if !q.is_empty() {
        return fail!("queue non-empty after draining every entry");
    }
    pass!()
}

fn test_remove_pulls_entry_out_before_its_deadline() -> TestResult {
    let mut q: SleepQueue<16> = SleepQueue::new();
    q.push(1, 100);
    let id2 = q.push(2, 50).unwrap();
    q.push(3, 200);
    let removed = q.remove(id2);
    if removed.task != 2 || removed.wake_time != 50 {
        return fail!("remove returned the wrong entry");
    }
    match q.peek() {
        Some(e) if e.task == 1 && e.wake_time == 100 => pass!(),
        _ => fail!("peek after an early remove did not reflect the new minimum"),
    }
}

fn test_equal_wake_times_both_surface() -> TestResult {
    let mut q: SleepQueue<16> = SleepQueue::new();
    q.push(1, 100);
    q.push(2, 100);
    let first = q.pop().unwrap();
    let second = q.pop().unwrap();
    if first.wake_time != 100 || second.wake_time != 100 {
        return fail!("tied wake times were not both honored");
    }
    pass!()
}

test_suite!(
    sleep_queue_suite,
    [
        test_peek_returns_minimum,
        test_pop_drains_in_nondecreasing_wake_order,
        test_remove_pulls_entry_out_before_its_deadline,
        test_equal_wake_times_both_surface,
    ]
);
