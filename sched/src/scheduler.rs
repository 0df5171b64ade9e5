//! Task table, ready ring, and sleep-queue integration: the core of the
//! preemptive round-robin scheduler. Wraps everything in a single
//! [`rtos_lib::IrqMutex`] rather than per-field locks — every operation here
//! is short enough that holding one lock for its duration is cheaper than
//! juggling several, and it keeps the "raw SP out, drop the lock, then
//! switch" discipline in one place.

use core::marker::PhantomData;

use rtos_abi::{
    Config, KernelError, KernelResult, PanicCode, SchedulerExecution, SchedulerState,
    SchedulerTiming, TaskHandle, kernel_panic,
};
use rtos_lib::IrqMutex;

use crate::policy::{PolicyContext, RoundRobin, SchedPolicy};
use crate::sleep_queue::SleepQueue;
use crate::task::{NO_TASK_ID, Task, TaskId, TaskState};

static ROUND_ROBIN: RoundRobin = RoundRobin;

/// Status register new tasks start with: GIE (bit 3) set, so a task resumes
/// with interrupts enabled the same way `reti` leaves them after any real
/// interrupt return.
const ENTRY_SR: u16 = 0x0008;

#[cfg(feature = "narrow-pc")]
fn entry_pc_of(entry: extern "C" fn(u16)) -> u16 {
    entry as usize as u16
}

#[cfg(feature = "wide-pc")]
fn entry_pc_of(entry: extern "C" fn(u16)) -> u32 {
    entry as usize as u32
}

fn encode(id: TaskId) -> TaskHandle {
    if id == NO_TASK_ID {
        core::ptr::null_mut()
    } else {
        ((id as usize) + 1) as TaskHandle
    }
}

fn decode(handle: TaskHandle) -> TaskId {
    let raw = handle as usize;
    if raw == 0 { NO_TASK_ID } else { (raw - 1) as TaskId }
}

struct SchedulerInner<const N: usize> {
    tasks: [Task; N],
    current: TaskId,
    ready_head: TaskId,
    sleep_queue: SleepQueue<N>,
    policy: &'static dyn SchedPolicy,
    need_resched: bool,

    total_created: u32,
    total_switches: u64,
    total_yields: u64,
    total_ticks: u32,
    schedule_calls: u32,
}

impl<const N: usize> SchedulerInner<N> {
    const fn new(policy: &'static dyn SchedPolicy) -> Self {
        let mut tasks = [Task::empty(0); N];
        let mut i = 0;
        while i < N {
            tasks[i] = Task::empty(i as TaskId);
            i += 1;
        }
        Self {
            tasks,
            current: NO_TASK_ID,
            ready_head: NO_TASK_ID,
            sleep_queue: SleepQueue::new(),
            policy,
            need_resched: false,
            total_created: 0,
            total_switches: 0,
            total_yields: 0,
            total_ticks: 0,
            schedule_calls: 0,
        }
    }

    fn find_free_slot(&self) -> Option<TaskId> {
        self.tasks.iter().find(|t| t.is_available()).map(|t| t.id)
    }

    fn live_count(&self) -> u32 {
        self.tasks.iter().filter(|t| !t.is_available()).count() as u32
    }

    /// Move every sleeper whose wake time has arrived back into the ready
    /// ring. Mirrors what the arch layer's wakeup ISR would do if it had
    /// direct sleep-queue access; here the queue lives in this crate, so the
    /// drain happens on the scheduler side of the ISR boundary instead.
    fn drain_sleepers(&mut self, now: u32) {
        while let Some(entry) = self.sleep_queue.peek() {
            if entry.wake_time > now {
                break;
            }
            self.sleep_queue.pop();
            let id = entry.task;
            if (id as usize) >= N {
                continue;
            }
            self.tasks[id as usize].state = TaskState::Ready;
            self.tasks[id as usize].sleep_node = rtos_rbtree::NIL;
            let policy = self.policy;
            policy.register(&mut *self, id);
        }
    }
}

impl<const N: usize> PolicyContext for SchedulerInner<N> {
    fn ready_push(&mut self, id: TaskId) {
        if id as usize >= N {
            return;
        }
        self.tasks[id as usize].ready_next = id;
        if self.ready_head == NO_TASK_ID {
            self.ready_head = id;
            return;
        }
        let head = self.ready_head;
        let mut tail = head;
        while self.tasks[tail as usize].ready_next != head {
            tail = self.tasks[tail as usize].ready_next;
        }
        self.tasks[tail as usize].ready_next = id;
        self.tasks[id as usize].ready_next = head;
    }

    fn ready_remove(&mut self, id: TaskId) {
        let head = self.ready_head;
        if head == NO_TASK_ID || id as usize >= N {
            return;
        }
        if self.tasks[id as usize].ready_next == NO_TASK_ID && head != id {
            return;
        }
        if head == id && self.tasks[id as usize].ready_next == id {
            self.ready_head = NO_TASK_ID;
            self.tasks[id as usize].ready_next = NO_TASK_ID;
            return;
        }
        let mut prev = head;
        while self.tasks[prev as usize].ready_next != id {
            prev = self.tasks[prev as usize].ready_next;
            if prev == head {
                return;
            }
        }
        let after = self.tasks[id as usize].ready_next;
        self.tasks[prev as usize].ready_next = after;
        if head == id {
            self.ready_head = after;
        }
        self.tasks[id as usize].ready_next = NO_TASK_ID;
    }

    fn ready_next_after(&self, id: TaskId) -> TaskId {
        if id == NO_TASK_ID {
            return self.ready_head;
        }
        if (id as usize) < N && self.tasks[id as usize].ready_next != NO_TASK_ID {
            self.tasks[id as usize].ready_next
        } else {
            self.ready_head
        }
    }

    fn ready_is_empty(&self) -> bool {
        self.ready_head == NO_TASK_ID
    }
}

/// The scheduler singleton. `C` picks tick rate and slot count at the type
/// level; `N` is the task table size, chosen by `rtos-kernel` to match
/// `C::MAX_TASKS` (Rust stable can't use an associated const directly as a
/// const generic argument, so the two are kept in sync by a boot-time
/// assertion instead).
pub struct Scheduler<C: Config, const N: usize> {
    inner: IrqMutex<SchedulerInner<N>>,
    _config: PhantomData<C>,
}

unsafe impl<C: Config, const N: usize> Send for Scheduler<C, N> {}
unsafe impl<C: Config, const N: usize> Sync for Scheduler<C, N> {}

impl<C: Config, const N: usize> Scheduler<C, N> {
    pub const fn new() -> Self {
        Self { inner: IrqMutex::new(SchedulerInner::new(&ROUND_ROBIN)), _config: PhantomData }
    }

    /// Allocate a TCB, build its initial stack image, and hand it to the
    /// active policy as ready-to-run. Interrupts stay enabled for the
    /// caller throughout; the table itself is protected by `inner`.
    pub fn create(
        &self,
        entry: extern "C" fn(u16),
        arg: u16,
        stack: &'static mut [u16],
    ) -> KernelResult<TaskHandle> {
        let mut inner = self.inner.lock();
        let id = inner.find_free_slot().ok_or(KernelError::NoMem)?;

        let entry_pc = entry_pc_of(entry);
        let exit_handler = rtos_arch::task_exit_trampoline as usize;
        let stack_base = stack.as_mut_ptr() as usize;
        let stack_words = stack.len();
        let base = rtos_arch::init_stack(stack, entry_pc, ENTRY_SR, arg, exit_handler);
        let sp = stack_base + base * core::mem::size_of::<u16>();
        let now = rtos_arch::time_now();

        {
            let task = &mut inner.tasks[id as usize];
            *task = Task::empty(id);
            task.state = TaskState::Ready;
            task.sp = sp;
            task.stack_base = stack_base;
            task.stack_words = stack_words;
            task.creation_time = now;
        }
        inner.total_created += 1;
        let policy = inner.policy;
        policy.register(&mut *inner, id);
        Ok(encode(id))
    }

    /// Caller must hold `inner`'s lock already released (SP values only,
    /// never a live reference) before calling `rtos_arch::context_switch` —
    /// the switch suspends this call stack, so nothing borrowed from the
    /// lock can still be alive when it runs.
    ///
    /// `resume_gie` is the incoming task's own `irq_was_enabled` flag, read
    /// by the caller while `inner` was still locked. The statement after
    /// `context_switch` runs on whichever task's stack SP now points at —
    /// the same call site, reached via every task's own earlier suspend —
    /// so this reliably reapplies *that* task's own saved GIE rather than
    /// whatever the outgoing task happened to leave the status register at.
    fn switch_to(&self, old_sp_ptr: *mut usize, new_sp: usize, resume_gie: bool) {
        unsafe {
            rtos_arch::context_switch(old_sp_ptr, new_sp);
        }
        if resume_gie {
            rtos_arch::enable_interrupts();
        } else {
            rtos_arch::disable_interrupts();
        }
    }

    fn sleep_ticks(&self, ticks: u32) {
        let caller_gie = rtos_arch::interrupts_enabled();
        let (old_sp_ptr, new_sp, resume_gie);
        {
            let mut inner = self.inner.lock();
            let current = inner.current;
            if current == NO_TASK_ID {
                return;
            }
            inner.tasks[current as usize].irq_was_enabled = caller_gie;
            let wake_time = rtos_arch::time_now().wrapping_add(ticks);
            let node = inner.sleep_queue.push(current, wake_time).unwrap_or(rtos_rbtree::NIL);
            inner.tasks[current as usize].sleep_node = node;
            inner.tasks[current as usize].wake_time = wake_time;
            inner.tasks[current as usize].state = TaskState::Sleeping;
            let policy = inner.policy;
            policy.unregister(&mut *inner, current);

            let next = policy.yield_next(&mut *inner, NO_TASK_ID);
            old_sp_ptr = &mut inner.tasks[current as usize].sp as *mut usize;
            if next == NO_TASK_ID {
                new_sp = inner.tasks[current as usize].sp;
                resume_gie = inner.tasks[current as usize].irq_was_enabled;
            } else {
                inner.tasks[next as usize].state = TaskState::Running;
                inner.current = next;
                new_sp = inner.tasks[next as usize].sp;
                resume_gie = inner.tasks[next as usize].irq_was_enabled;
                inner.total_switches += 1;
            }
            rtos_arch::timer::arm_wakeup::<C>(ticks);
        }
        self.switch_to(old_sp_ptr, new_sp, resume_gie);
    }

    /// Milliseconds, converted to ticks at `C::TICK_RATE_HZ`. Unlike the
    /// original's `sleep_for`, which only computes a wake deadline and
    /// leaves the caller on the ready list until the next tick notices it's
    /// overdue, this actually removes the caller from the ready set and
    /// arms a wakeup before yielding.
    pub fn sleep_ms(&self, ms: u32) {
        let ticks = (ms.saturating_mul(C::TICK_RATE_HZ)) / 1000;
        self.sleep_ticks(ticks.max(1));
    }

    fn exit_with_code(&self, code: i32) -> ! {
        let (old_sp_ptr, new_sp, resume_gie);
        {
            let mut inner = self.inner.lock();
            let current = inner.current;
            if current == NO_TASK_ID {
                kernel_panic(PanicCode::GeneralError);
            }
            if inner.tasks[current as usize].state == TaskState::Zombie {
                kernel_panic(PanicCode::AssertFail);
            }

            let policy = inner.policy;
            policy.unregister(&mut *inner, current);
            inner.tasks[current as usize].exit_code = code;
            inner.tasks[current as usize].state = TaskState::Zombie;

            let joiner = inner.tasks[current as usize].joiner;
            if joiner != NO_TASK_ID && inner.tasks[joiner as usize].state == TaskState::Blocked {
                inner.tasks[joiner as usize].state = TaskState::Ready;
                policy.register(&mut *inner, joiner);
            }

            let next = policy.yield_next(&mut *inner, NO_TASK_ID);
            old_sp_ptr = &mut inner.tasks[current as usize].sp as *mut usize;
            inner.current = next;
            if next != NO_TASK_ID {
                inner.tasks[next as usize].state = TaskState::Running;
                new_sp = inner.tasks[next as usize].sp;
                resume_gie = inner.tasks[next as usize].irq_was_enabled;
                inner.total_switches += 1;
            } else {
                new_sp = inner.tasks[current as usize].sp;
                resume_gie = inner.tasks[current as usize].irq_was_enabled;
            }
        }
        self.switch_to(old_sp_ptr, new_sp, resume_gie);
        unreachable!("exited task's stack must never be resumed directly");
    }

    /// Reclaims a zombie slot's accounting once nothing will ever wait on it
    /// again (joined, or detached and already a zombie).
    fn reclaim(inner: &mut SchedulerInner<N>, id: TaskId) {
        inner.tasks[id as usize] = Task::empty(id);
    }

    /// Explicit exit with a caller-chosen return code, for `join` to read.
    pub fn exit(&self, code: i32) -> ! {
        self.exit_with_code(code)
    }

    pub fn join(&self, handle: TaskHandle) -> i32 {
        let target = decode(handle);
        if target as usize >= N {
            return 0;
        }
        loop {
            let (should_block, code) = {
                let mut inner = self.inner.lock();
                match inner.tasks[target as usize].state {
                    TaskState::Zombie => {
                        let code = inner.tasks[target as usize].exit_code;
                        Self::reclaim(&mut inner, target);
                        (false, code)
                    }
                    TaskState::Available => (false, 0),
                    _ => {
                        inner.tasks[target as usize].joiner = inner.current;
                        (true, 0)
                    }
                }
            };
            if !should_block {
                return code;
            }
            self.block_current();
        }
    }

    /// Picks the first ready task and hands control to it via
    /// `rtos_arch::sched_start`. Never returns to its caller; `rtos-kernel`
    /// calls this once, after every boot task has been created.
    pub fn start(&self) -> ! {
        let first_sp = {
            let mut inner = self.inner.lock();
            let policy = inner.policy;
            let first = policy.yield_next(&mut *inner, NO_TASK_ID);
            if first == NO_TASK_ID {
                kernel_panic(PanicCode::GeneralError);
            }
            inner.tasks[first as usize].state = TaskState::Running;
            inner.current = first;
            inner.tasks[first as usize].sp
        };
        unsafe { rtos_arch::sched_start(first_sp) }
    }

    pub fn detach(&self, handle: TaskHandle) {
        let target = decode(handle);
        if target as usize >= N {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.tasks[target as usize].state == TaskState::Zombie {
            Self::reclaim(&mut inner, target);
        } else {
            inner.tasks[target as usize].detached = true;
        }
    }
}

impl<C: Config, const N: usize> SchedulerTiming for Scheduler<C, N> {
    fn on_tick(&self) {
        let mut inner = self.inner.lock();
        inner.total_ticks += 1;
        let now = rtos_arch::time_now();
        inner.drain_sleepers(now);
        if inner.current != NO_TASK_ID {
            inner.tasks[inner.current as usize].total_runtime += 1;
            inner.tasks[inner.current as usize].last_run_timestamp = now;
        }

        if C::TICKLESS_IDLE && inner.live_count() <= 1 {
            rtos_arch::timer::suppress_tick();
        }
        match inner.sleep_queue.peek() {
            Some(entry) => rtos_arch::timer::arm_wakeup::<C>(entry.wake_time.saturating_sub(now)),
            None => rtos_arch::timer::suppress_wakeup(),
        }
        inner.need_resched = true;
    }

    fn handle_post_irq(&self) {
        let (old_sp_ptr, new_sp, resume_gie) = {
            let mut inner = self.inner.lock();
            if !inner.need_resched {
                return;
            }
            inner.need_resched = false;
            inner.schedule_calls += 1;

            let current = inner.current;
            let policy = inner.policy;
            let next = policy.yield_next(&mut *inner, current);
            if next == current || next == NO_TASK_ID {
                return;
            }
            if current != NO_TASK_ID {
                // Reaching this ISR at all means GIE was set when it fired
                // — the interrupted task was never inside a critical
                // section, whatever the status register reads right now.
                inner.tasks[current as usize].irq_was_enabled = true;
                if inner.tasks[current as usize].state == TaskState::Running {
                    inner.tasks[current as usize].state = TaskState::Ready;
                }
            }
            inner.tasks[next as usize].state = TaskState::Running;
            inner.current = next;
            inner.total_switches += 1;

            let old_ptr = if current == NO_TASK_ID {
                core::ptr::null_mut()
            } else {
                &mut inner.tasks[current as usize].sp as *mut usize
            };
            (old_ptr, inner.tasks[next as usize].sp, inner.tasks[next as usize].irq_was_enabled)
        };
        if old_sp_ptr.is_null() {
            // No previously-running task to save (boot path); the caller is
            // expected to be `sched_start`, which discards this SP anyway.
            return;
        }
        self.switch_to(old_sp_ptr, new_sp, resume_gie);
    }

    fn request_reschedule(&self) {
        self.inner.lock().need_resched = true;
    }
}

impl<C: Config, const N: usize> SchedulerExecution for Scheduler<C, N> {
    fn current_task(&self) -> TaskHandle {
        encode(self.inner.lock().current)
    }

    fn yield_now(&self) {
        let caller_gie = rtos_arch::interrupts_enabled();
        let (old_sp_ptr, new_sp, resume_gie);
        {
            let mut inner = self.inner.lock();
            let current = inner.current;
            if current == NO_TASK_ID {
                return;
            }
            let policy = inner.policy;
            let next = policy.yield_next(&mut *inner, current);
            if next == current || next == NO_TASK_ID {
                return;
            }
            inner.tasks[current as usize].irq_was_enabled = caller_gie;
            inner.tasks[current as usize].yield_count += 1;
            inner.total_yields += 1;
            inner.tasks[current as usize].state = TaskState::Ready;
            inner.tasks[next as usize].state = TaskState::Running;
            old_sp_ptr = &mut inner.tasks[current as usize].sp as *mut usize;
            new_sp = inner.tasks[next as usize].sp;
            resume_gie = inner.tasks[next as usize].irq_was_enabled;
            inner.current = next;
            inner.total_switches += 1;
        }
        self.switch_to(old_sp_ptr, new_sp, resume_gie);
    }

    fn yield_higher(&self) {
        let caller_gie = rtos_arch::interrupts_enabled();
        let (old_sp_ptr, new_sp, resume_gie);
        {
            let mut inner = self.inner.lock();
            let current = inner.current;
            if current == NO_TASK_ID {
                return;
            }
            let policy = inner.policy;
            let next = policy.yield_higher(&mut *inner, current);
            if next == current || next == NO_TASK_ID {
                return;
            }
            inner.tasks[current as usize].irq_was_enabled = caller_gie;
            inner.tasks[current as usize].state = TaskState::Ready;
            inner.tasks[next as usize].state = TaskState::Running;
            old_sp_ptr = &mut inner.tasks[current as usize].sp as *mut usize;
            new_sp = inner.tasks[next as usize].sp;
            resume_gie = inner.tasks[next as usize].irq_was_enabled;
            inner.current = next;
            inner.total_switches += 1;
        }
        self.switch_to(old_sp_ptr, new_sp, resume_gie);
    }

    fn block_current(&self) {
        let caller_gie = rtos_arch::interrupts_enabled();
        let (old_sp_ptr, new_sp, resume_gie);
        {
            let mut inner = self.inner.lock();
            let current = inner.current;
            if current == NO_TASK_ID {
                return;
            }
            inner.tasks[current as usize].irq_was_enabled = caller_gie;
            inner.tasks[current as usize].state = TaskState::Blocked;
            let policy = inner.policy;
            policy.unregister(&mut *inner, current);
            let next = policy.yield_next(&mut *inner, NO_TASK_ID);
            old_sp_ptr = &mut inner.tasks[current as usize].sp as *mut usize;
            inner.current = next;
            if next != NO_TASK_ID {
                inner.tasks[next as usize].state = TaskState::Running;
                new_sp = inner.tasks[next as usize].sp;
                resume_gie = inner.tasks[next as usize].irq_was_enabled;
                inner.total_switches += 1;
            } else {
                new_sp = inner.tasks[current as usize].sp;
                resume_gie = inner.tasks[current as usize].irq_was_enabled;
            }
        }
        self.switch_to(old_sp_ptr, new_sp, resume_gie);
    }

    fn unblock(&self, task: TaskHandle) -> bool {
        let id = decode(task);
        if id as usize >= N {
            return false;
        }
        let mut inner = self.inner.lock();
        if inner.tasks[id as usize].state != TaskState::Blocked {
            return false;
        }
        inner.tasks[id as usize].state = TaskState::Ready;
        let policy = inner.policy;
        policy.register(&mut *inner, id);
        inner.need_resched = true;
        true
    }

    fn is_blocked(&self, task: TaskHandle) -> bool {
        let id = decode(task);
        if id as usize >= N {
            return false;
        }
        self.inner.lock().tasks[id as usize].state == TaskState::Blocked
    }

    fn terminate_current(&self) -> ! {
        self.exit_with_code(0)
    }
}

impl<C: Config, const N: usize> SchedulerState for Scheduler<C, N> {
    fn task_stats(&self) -> (u32, u32, u64) {
        let inner = self.inner.lock();
        (inner.total_created, inner.live_count(), inner.total_switches)
    }

    fn scheduler_stats(&self) -> (u64, u64, u32, u32) {
        let inner = self.inner.lock();
        let ready_count = inner
            .tasks
            .iter()
            .filter(|t| matches!(t.state, TaskState::Ready))
            .count() as u32;
        (inner.total_switches, inner.total_yields, ready_count, inner.schedule_calls)
    }
}
