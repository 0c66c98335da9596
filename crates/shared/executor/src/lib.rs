//! Agora Execution Contexts
//!
//! Implementations of the `Executor` port:
//!
//! ```text
//! Storage threads ──► Executor::execute ──► ┌──────────────────────┐
//!                                           │  single task queue   │──► tasks run one at a time,
//! Executor::execute_after(delay) ─────────► │  (FIFO)              │    in submission order
//!                                           └──────────────────────┘
//! ```
//!
//! - [`UserThread`]: production context backed by a tokio task
//! - [`ManualExecutor`]: deterministic context for tests; time only moves
//!   when explicitly advanced
//!
//! ## Usage
//!
//! ```ignore
//! use agora_executor::{ManualExecutor, Executor};
//! use std::time::Duration;
//!
//! let executor = ManualExecutor::new();
//! executor.execute_after(Duration::from_secs(1), Box::new(|| println!("later")));
//!
//! executor.run_pending();                    // nothing due yet
//! executor.advance(Duration::from_secs(1));  // runs the delayed task
//! ```

mod manual;
mod user_thread;

pub use manual::ManualExecutor;
pub use user_thread::UserThread;

// Re-export the Executor trait for convenience
pub use agora_ports::{Executor, Task};
