//! Round-robin ready-set policy: fairness and the two-tasks-alternating
//! end-to-end scenario, driven against a small standalone ready ring rather
//! than a live scheduler so the property is exercised in isolation from
//! context switching.

use rtos_sched::{NO_TASK_ID, PolicyContext, RoundRobin, SchedPolicy, TaskId};
use rtos_lib::{fail, pass, test_suite};
use rtos_lib::testing::TestResult;

/// Minimal ready ring good enough to drive [`PolicyContext`]: a fixed-size
/// array of `(present, next)` pairs, mirroring the circular singly-linked
/// list the real scheduler keeps inside its task table.
struct TestRing<const N: usize> {
    next: [TaskId; N],
    present: [bool; N],
    head: TaskId,
}

impl<const N: usize> TestRing<N> {
    fn new() -> Self {
        Self { next: [NO_TASK_ID; N], present: [false; N], head: NO_TASK_ID }
    }
}

impl<const N: usize> PolicyContext for TestRing<N> {
    fn ready_push(&mut self, id: TaskId) {
        if self.present[id as usize] {
            return;
        }
        self.present[id as usize] = true;
        if self.head == NO_TASK_ID {
            self.head = id;
            self.next[id as usize] = id;
            return;
        }
        let mut tail = self.head;
        while self.next[tail as usize] != self.head {
            tail = self.next[tail as usize];
        }
        self.next[tail as usize] = id;
        self.next[id as usize] = self.head;
    }

    fn ready_remove(&mut self, id: TaskId) {
        if !self.present[id as usize] {
            return;
        }
        self.present[id as usize] = false;
        if self.next[id as usize] == id {
            self.head = NO_TASK_ID;
            return;
        }
        let mut pred = self.head;
        while self.next[pred as usize] != id {
            pred = self.next[pred as usize];
        }
        self.next[pred as usize] = self.next[id as usize];
        if self.head == id {
            self.head = self.next[id as usize];
        }
    }

    fn ready_next_after(&self, id: TaskId) -> TaskId {
        if id == NO_TASK_ID || self.next[id as usize] == NO_TASK_ID {
            return self.head;
        }
        self.next[id as usize]
    }

    fn ready_is_empty(&self) -> bool {
        self.head == NO_TASK_ID
    }
}

fn test_round_robin_visits_every_task_within_n_ticks() -> TestResult {
    let policy = RoundRobin;
    let mut ring: TestRing<8> = TestRing::new();
    const COUNT: usize = 5;
    for id in 0..COUNT as TaskId {
        policy.register(&mut ring, id);
    }

    let mut visited = [false; COUNT];
    let mut current = NO_TASK_ID;
    for _ in 0..COUNT {
        current = policy.yield_next(&mut ring, current);
        visited[current as usize] = true;
    }
    if visited.iter().any(|v| !v) {
        return fail!("round robin failed to visit every task within N ticks");
    }
    pass!()
}

fn test_two_tasks_alternate_ababab() -> TestResult {
    let policy = RoundRobin;
    let mut ring: TestRing<4> = TestRing::new();
    const TASK_A: TaskId = 0;
    const TASK_B: TaskId = 1;
    policy.register(&mut ring, TASK_A);
    policy.register(&mut ring, TASK_B);

    let mut output = [0u8; 6];
    let mut current = NO_TASK_ID;
    for slot in output.iter_mut() {
        current = policy.yield_next(&mut ring, current);
        *slot = if current == TASK_A { b'A' } else { b'B' };
    }
    if &output != b"ABABAB" {
        return fail!("expected ABABAB, got {:?}", core::str::from_utf8(&output));
    }
    pass!()
}

fn test_unregister_mid_ring_keeps_remaining_fair() -> TestResult {
    let policy = RoundRobin;
    let mut ring: TestRing<8> = TestRing::new();
    for id in 0..4 {
        policy.register(&mut ring, id);
    }
    policy.unregister(&mut ring, 2);

    let mut current = NO_TASK_ID;
    let mut visited = [false; 4];
    for _ in 0..3 {
        current = policy.yield_next(&mut ring, current);
        visited[current as usize] = true;
    }
    if visited[2] {
        return fail!("unregistered task was still scheduled");
    }
    if !(visited[0] && visited[1] && visited[3]) {
        return fail!("remaining tasks were not all visited after an unregister");
    }
    pass!()
}

fn test_empty_ring_yields_no_task_id() -> TestResult {
    let policy = RoundRobin;
    let mut ring: TestRing<4> = TestRing::new();
    if policy.yield_next(&mut ring, NO_TASK_ID) != NO_TASK_ID {
        return fail!("empty ready ring produced a task id");
    }
    pass!()
}

test_suite!(
    policy_suite,
    [
        test_round_robin_visits_every_task_within_n_ticks,
        test_two_tasks_alternate_ababab,
        test_unregister_mid_ring_keeps_remaining_fair,
        test_empty_ring_yields_no_task_id,
    ]
);
