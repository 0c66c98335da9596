use agora_ports::{Executor, Task};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Single execution context backed by one tokio task
///
/// Every submitted task is pushed onto one unbounded queue that a single
/// consumer task drains, so tasks never overlap and keep submission order.
/// Delayed tasks sleep on the runtime and then join the same queue.
pub struct UserThread {
    tx: UnboundedSender<Task>,
    handle: Handle,
    name: String,
}

impl UserThread {
    /// Start the context on the current tokio runtime
    ///
    /// Must be called from within a runtime.
    pub fn spawn(name: impl Into<String>) -> Arc<Self> {
        Self::spawn_on(Handle::current(), name)
    }

    /// Start the context on the given runtime
    pub fn spawn_on(handle: Handle, name: impl Into<String>) -> Arc<Self> {
        let name = name.into();
        let (tx, rx) = mpsc::unbounded_channel::<Task>();

        let loop_name = name.clone();
        handle.spawn(async move {
            Self::run(rx, loop_name).await;
        });

        debug!("Started execution context '{}'", name);

        Arc::new(Self { tx, handle, name })
    }

    async fn run(mut rx: UnboundedReceiver<Task>, name: String) {
        while let Some(task) = rx.recv().await {
            task();
        }
        debug!("Execution context '{}' stopped", name);
    }
}

impl Executor for UserThread {
    fn execute(&self, task: Task) {
        if self.tx.send(task).is_err() {
            warn!("Execution context '{}' is closed, dropping task", self.name);
        }
    }

    fn execute_after(&self, delay: Duration, task: Task) {
        let tx = self.tx.clone();
        let name = self.name.clone();
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(task).is_err() {
                warn!("Execution context '{}' is closed, dropping delayed task", name);
            }
        });
    }

    fn name(&self) -> &str {
        &self.name
    }
}
