use std::sync::{Arc, Mutex};

use crate::RunError;

type Continuation<T> = Box<dyn FnOnce(Result<T, RunError>)>;

enum State<T> {
    Pending(Vec<Continuation<T>>),
    Settled(Result<T, RunError>),
}

/// A one-shot container for an eventual result. Settles exactly once; the
/// first settle wins and later settles are ignored. Continuations registered
/// after settlement receive the cached result immediately.
///
/// Faults travel through the same container as successes, so a chain of
/// awaited futures always ends settled rather than pending forever.
pub struct Future<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone> Future<T> {
    pub fn pending() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::Pending(Vec::new()))),
        }
    }

    /// An already-settled future, for values that are ready up front.
    pub fn settled(result: Result<T, RunError>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::Settled(result))),
        }
    }

    /// Settles the future and notifies every waiting continuation. A second
    /// settle is a no-op.
    pub fn settle(&self, result: Result<T, RunError>) {
        let waiters = {
            let mut state = self.state.lock().expect("future state lock");
            match &mut *state {
                State::Pending(waiters) => {
                    let waiters = std::mem::take(waiters);
                    *state = State::Settled(result.clone());
                    waiters
                }
                State::Settled(_) => return,
            }
        };
        // Continuations run outside the lock; they may inspect this future.
        for waiter in waiters {
            waiter(result.clone());
        }
    }

    /// Registers `f` to run with the result. Runs immediately (on the caller's
    /// stack) if the future is already settled.
    pub fn when_settled(&self, f: impl FnOnce(Result<T, RunError>) + 'static) {
        let result = {
            let mut state = self.state.lock().expect("future state lock");
            match &mut *state {
                State::Pending(waiters) => {
                    waiters.push(Box::new(f));
                    return;
                }
                State::Settled(result) => result.clone(),
            }
        };
        f(result);
    }

    /// The cached result, if settled. Does not consume or disturb waiters.
    pub fn peek(&self) -> Option<Result<T, RunError>> {
        match &*self.state.lock().expect("future state lock") {
            State::Pending(_) => None,
            State::Settled(result) => Some(result.clone()),
        }
    }
}
