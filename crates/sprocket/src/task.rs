use crate::future::Future;
use crate::RunError;

/// What a task does with one step: suspend on a future, hand back a plain
/// value, or finish.
pub enum Step<T> {
    /// Suspend until the future settles; the settled value becomes the next
    /// `resume` input.
    Await(Future<T>),
    /// Hand back a plain value; the driver resumes the task synchronously
    /// with that same value instead of leaving it stranded.
    Yield(T),
    /// Terminate with a final value.
    Done(T),
}

/// A suspendable computation expressed as an explicit state machine.
///
/// The driver calls `resume` with `None` exactly once (the first step), then
/// with `Some(value)` carrying the result of whatever the task last awaited.
/// Step position is owned entirely by the implementor; a failed step returns
/// `Err` and is fatal to the task.
pub trait Task<T> {
    fn resume(&mut self, input: Option<T>) -> Result<Step<T>, RunError>;
}
