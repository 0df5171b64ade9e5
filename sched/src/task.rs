//! Task control block.

/// Index into the scheduler's fixed task table. `NO_TASK_ID` marks "no task"
/// the same way `rtos_rbtree::NIL` marks "no node" — both are arena designs
/// with no dynamic allocation.
pub type TaskId = u16;
pub const NO_TASK_ID: TaskId = u16::MAX;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskState {
    /// Slot is free and may be handed out by `create`.
    Available,
    /// In the ready ring, eligible to run.
    Ready,
    /// The single currently-executing task.
    Running,
    /// In the sleep queue, not eligible to run until its wake time.
    Sleeping,
    /// Blocked on a semaphore/mutex/condvar wait, or joining another task.
    Blocked,
    /// Ran to completion; `exit_code` is valid, slot held open for `join`.
    Zombie,
}

#[derive(Clone, Copy)]
pub struct Task {
    pub id: TaskId,
    pub state: TaskState,

    /// Saved stack pointer; meaningless while `state == Running` (the live
    /// value is the CPU's SP register in that case).
    pub sp: usize,
    pub stack_base: usize,
    pub stack_words: usize,

    /// Circular ready-ring link, owned by whichever `SchedPolicy` is active.
    /// `NO_TASK_ID` means "not currently in the ready ring".
    pub ready_next: TaskId,

    /// Sleep queue membership.
    pub sleep_node: rtos_rbtree::NodeId,
    pub wake_time: u32,

    /// `join`/`detach`/`exit` bookkeeping.
    pub detached: bool,
    pub joiner: TaskId,
    pub exit_code: i32,

    /// GIE state this task had the moment it was last suspended. A task
    /// that entered a critical section and then called into a blocking
    /// scheduler API without leaving it must resume still masked — the
    /// live status register is shared by every task and says nothing about
    /// what any one of them was doing, so this has to be saved and
    /// restored per task rather than read off the CPU at resume time.
    pub irq_was_enabled: bool,

    /// Accounting, surfaced by `rtos-kernel`'s stats API. No invariant here
    /// depends on these; they exist for diagnostics only.
    pub yield_count: u32,
    pub total_runtime: u32,
    pub last_run_timestamp: u32,
    pub creation_time: u32,
}

impl Task {
    pub const fn empty(id: TaskId) -> Self {
        Self {
            id,
            state: TaskState::Available,
            sp: 0,
            stack_base: 0,
            stack_words: 0,
            ready_next: NO_TASK_ID,
            sleep_node: rtos_rbtree::NIL,
            wake_time: 0,
            detached: false,
            joiner: NO_TASK_ID,
            exit_code: 0,
            irq_was_enabled: true,
            yield_count: 0,
            total_runtime: 0,
            last_run_timestamp: 0,
            creation_time: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, TaskState::Available)
    }
}
