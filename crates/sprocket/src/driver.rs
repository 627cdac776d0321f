use std::sync::{Arc, Mutex};

use crate::future::Future;
use crate::scope::Scope;
use crate::task::{Step, Task};
use crate::RunError;

pub type TaskHandle<T> = Arc<Mutex<Box<dyn Task<T>>>>;
pub type DoneFn<T> = Box<dyn FnOnce(Result<T, RunError>)>;

/// Advances `task` until it either completes, faults, or parks on a future
/// that has not settled yet.
///
/// `input` carries the result of the task's last suspension point (`None` on
/// the very first step). When the task completes, `on_done` is invoked
/// exactly once with the final value; a fault is delivered the same way. A
/// faulting task with no `on_done` (a companion) is logged rather than
/// silently discarded.
///
/// Already-settled awaits and plain yields are consumed by the loop below;
/// only a genuinely pending future re-enters `pump` via its continuation, so
/// an arbitrarily long chain of ready resumptions never grows the stack.
pub fn pump<T: Clone + 'static>(
    task: TaskHandle<T>,
    input: Option<T>,
    on_done: Option<DoneFn<T>>,
) {
    let mut input = input;
    let mut on_done = on_done;
    loop {
        let step = {
            let mut task = task.lock().expect("task lock");
            task.resume(input.take())
        };
        match step {
            Ok(Step::Done(value)) => {
                if let Some(done) = on_done.take() {
                    done(Ok(value));
                }
                return;
            }
            Ok(Step::Yield(value)) => {
                // Plain value: resume immediately with the same value.
                input = Some(value);
            }
            Ok(Step::Await(future)) => {
                if let Some(result) = future.peek() {
                    match result {
                        Ok(value) => input = Some(value),
                        Err(err) => {
                            fail(on_done.take(), err);
                            return;
                        }
                    }
                    continue;
                }
                let task = task.clone();
                let done = on_done.take();
                future.when_settled(move |result| match result {
                    Ok(value) => pump(task, Some(value), done),
                    Err(err) => fail(done, err),
                });
                return;
            }
            Err(err) => {
                fail(on_done.take(), err);
                return;
            }
        }
    }
}

fn fail<T>(on_done: Option<DoneFn<T>>, err: RunError) {
    match on_done {
        Some(done) => done(Err(err)),
        None => log::error!("companion task fault: {err}"),
    }
}

/// Starts `primary` against `scope` and returns a future that settles with
/// its final value, or with its fault.
pub fn run<T, V, A, P>(scope: Arc<Scope<V>>, args: A, primary: P) -> Future<T>
where
    T: Clone + 'static,
    P: FnOnce(Arc<Scope<V>>, A) -> Box<dyn Task<T>>,
{
    let result = Future::pending();
    start(scope, args, primary, Some(done_settler(&result)));
    result
}

/// Starts `primary` and a `companion` task against the same `scope`; the two
/// coordinate through whatever shared resources the scope binds (typically a
/// [`crate::Sprocket`]).
///
/// The primary runs to its first suspension point before the companion takes
/// its first step; each then advances independently as its own awaited
/// futures settle. The returned future settles exactly once, with the
/// primary's outcome. The companion's completion value is discarded (it may
/// carry a different value type than the primary) and its fault is logged.
pub fn run_with_companion<T, U, V, A, P, C>(
    scope: Arc<Scope<V>>,
    args: A,
    primary: P,
    companion: C,
) -> Future<T>
where
    T: Clone + 'static,
    U: Clone + 'static,
    A: Clone,
    P: FnOnce(Arc<Scope<V>>, A) -> Box<dyn Task<T>>,
    C: FnOnce(Arc<Scope<V>>, A) -> Box<dyn Task<U>>,
{
    let result = Future::pending();
    start(
        scope.clone(),
        args.clone(),
        primary,
        Some(done_settler(&result)),
    );
    start(scope, args, companion, None);
    result
}

fn start<T, V, A, F>(scope: Arc<Scope<V>>, args: A, factory: F, on_done: Option<DoneFn<T>>)
where
    T: Clone + 'static,
    F: FnOnce(Arc<Scope<V>>, A) -> Box<dyn Task<T>>,
{
    let task: TaskHandle<T> = Arc::new(Mutex::new(factory(scope, args)));
    pump(task, None, on_done);
}

fn done_settler<T: Clone + 'static>(result: &Future<T>) -> DoneFn<T> {
    let result = result.clone();
    Box::new(move |outcome| result.settle(outcome))
}
