//! Cooperative single-threaded multitasking built from two primitives: a
//! one-slot rendezvous channel ([`Sprocket`]) and a trampoline driver
//! ([`pump`]) that resumes suspendable tasks as their awaited values settle.
//!
//! "Concurrency" here means interleaving at explicit suspension points, not
//! parallel execution. Two tasks started by [`run_with_companion`] coordinate
//! only through a shared [`Sprocket`] placed in a [`Scope`].

mod channel;
mod driver;
mod future;
mod scope;
mod task;

pub use channel::Sprocket;
pub use driver::{pump, run, run_with_companion, DoneFn, TaskHandle};
pub use future::Future;
pub use scope::Scope;
pub use task::{Step, Task};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// `write` was called while another writer was already parked.
    #[error("unexpected writer")]
    UnexpectedWriter,
    /// `read` was called while another reader was already parked.
    #[error("unexpected reader")]
    UnexpectedReader,
    /// A task step failed between suspension points.
    #[error("task fault: {0}")]
    TaskFault(String),
}
