use agora_ports::{Executor, Task};
use parking_lot::Mutex;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Deterministic execution context for tests
///
/// Nothing runs until the owner calls [`ManualExecutor::run_pending`] or
/// [`ManualExecutor::advance`]. Virtual time starts at zero and only moves
/// when advanced, so delayed tasks fire exactly when the test says so.
pub struct ManualExecutor {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    /// Current virtual time (elapsed since creation)
    now: Duration,
    ready: VecDeque<Task>,
    /// Timer ids ordered by (due time, submission sequence)
    timers: PriorityQueue<u64, Reverse<(Duration, u64)>>,
    timer_tasks: HashMap<u64, Task>,
    next_timer_id: u64,
}

impl ManualExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State::default()),
        })
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Tasks ready to run
    pub fn pending_count(&self) -> usize {
        self.state.lock().ready.len()
    }

    /// Delayed tasks not yet due
    pub fn timer_count(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Run ready tasks until the queue is empty, including tasks they submit
    ///
    /// Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        // The lock is released before each task so tasks can submit more work
        while let Some(task) = self.next_ready() {
            task();
            ran += 1;
        }
        ran
    }

    /// Move virtual time forward by `by`, running every task that becomes due
    ///
    /// Timers fire in due order; tasks they submit run before the next timer.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = self.run_pending();

        while let Some(task) = self.next_timer_due_by(target) {
            self.state.lock().ready.push_back(task);
            ran += self.run_pending();
        }

        self.state.lock().now = target;
        ran + self.run_pending()
    }

    fn next_ready(&self) -> Option<Task> {
        self.state.lock().ready.pop_front()
    }

    fn next_timer_due_by(&self, target: Duration) -> Option<Task> {
        let mut state = self.state.lock();
        let (due, _) = match state.timers.peek() {
            Some((_, Reverse(key))) if key.0 <= target => *key,
            _ => return None,
        };
        let (id, _) = state.timers.pop()?;
        state.now = due;
        state.timer_tasks.remove(&id)
    }
}

impl Executor for ManualExecutor {
    fn execute(&self, task: Task) {
        self.state.lock().ready.push_back(task);
    }

    fn execute_after(&self, delay: Duration, task: Task) {
        let mut state = self.state.lock();
        let id = state.next_timer_id;
        state.next_timer_id += 1;
        let due = state.now + delay;
        state.timers.push(id, Reverse((due, id)));
        state.timer_tasks.insert(id, task);
    }

    fn name(&self) -> &str {
        "ManualExecutor"
    }
}
