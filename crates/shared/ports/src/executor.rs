use std::time::Duration;

/// Unit of work handed to an executor
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Port for the single cooperative execution context
///
/// Tasks submitted to one executor never run concurrently with each other and
/// run in submission order. Delayed tasks are queued behind everything already
/// submitted once their delay has elapsed.
pub trait Executor: Send + Sync {
    /// Run `task` on the execution context as soon as possible
    fn execute(&self, task: Task);

    /// Run `task` on the execution context after `delay`
    fn execute_after(&self, delay: Duration, task: Task);

    /// Get the executor's name/identifier for debugging
    fn name(&self) -> &str {
        "Executor"
    }
}
