use std::sync::Mutex;

use crate::future::Future;
use crate::RunError;

/// A parked writer: the value waiting to be handed off, plus the future the
/// writing task is suspended on.
struct Parked<T> {
    value: T,
    done: Future<T>,
}

struct Slots<T> {
    reader: Option<Future<T>>,
    writer: Option<Parked<T>>,
}

/// A single-slot rendezvous channel. At most one reader and one writer may be
/// parked at any instant; the moment both are present they are paired and
/// both slots cleared in the same critical section. No value is ever queued
/// beyond the pairing instant.
pub struct Sprocket<T> {
    slots: Mutex<Slots<T>>,
}

impl<T: Clone> Default for Sprocket<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Sprocket<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                reader: None,
                writer: None,
            }),
        }
    }

    /// Parks `value` for one matched read. The returned future settles with
    /// the value once pairing completes: synchronously if a reader is already
    /// parked, otherwise when a later `read` arrives.
    ///
    /// Calling `write` while a writer is already parked is a programming
    /// error in the task logic and fails with [`RunError::UnexpectedWriter`].
    pub fn write(&self, value: T) -> Result<Future<T>, RunError> {
        let done = Future::pending();
        let pair = {
            let mut slots = self.slots.lock().expect("sprocket slots lock");
            if slots.writer.is_some() {
                return Err(RunError::UnexpectedWriter);
            }
            slots.writer = Some(Parked {
                value,
                done: done.clone(),
            });
            take_pair(&mut slots)
        };
        if let Some((parked, reader)) = pair {
            deliver(parked, reader);
        }
        Ok(done)
    }

    /// Parks intent to receive one value. The returned future settles with
    /// the paired value once a writer is present.
    ///
    /// Fails with [`RunError::UnexpectedReader`] if a reader is already
    /// parked.
    pub fn read(&self) -> Result<Future<T>, RunError> {
        let done = Future::pending();
        let pair = {
            let mut slots = self.slots.lock().expect("sprocket slots lock");
            if slots.reader.is_some() {
                return Err(RunError::UnexpectedReader);
            }
            slots.reader = Some(done.clone());
            take_pair(&mut slots)
        };
        if let Some((parked, reader)) = pair {
            deliver(parked, reader);
        }
        Ok(done)
    }

    /// Non-blocking write: rendezvous only with an already-parked reader.
    /// Returns the delivered value, or `None` when no reader was waiting (the
    /// value is not queued and the channel is left untouched).
    pub fn write_now(&self, value: T) -> Option<T> {
        let reader = {
            let mut slots = self.slots.lock().expect("sprocket slots lock");
            slots.reader.take()?
        };
        log::trace!("sprocket: immediate write paired with parked reader");
        reader.settle(Ok(value.clone()));
        Some(value)
    }

    /// Non-blocking read: consumes an already-parked writer, settling that
    /// writer's future as well. Returns `None` when no writer was waiting.
    pub fn read_now(&self) -> Option<T> {
        let parked = {
            let mut slots = self.slots.lock().expect("sprocket slots lock");
            slots.writer.take()?
        };
        log::trace!("sprocket: immediate read consumed parked writer");
        parked.done.settle(Ok(parked.value.clone()));
        Some(parked.value)
    }
}

/// The single synchronization point: if both a reader and a writer are
/// parked, take both in one step so a value can never be delivered and also
/// left parked.
fn take_pair<T>(slots: &mut Slots<T>) -> Option<(Parked<T>, Future<T>)> {
    if slots.reader.is_some() && slots.writer.is_some() {
        let parked = slots.writer.take()?;
        let reader = slots.reader.take()?;
        Some((parked, reader))
    } else {
        None
    }
}

/// Settles both sides of a completed pairing. Runs with the slots lock
/// released: a continuation woken here may immediately re-enter the channel.
fn deliver<T: Clone>(parked: Parked<T>, reader: Future<T>) {
    log::trace!("sprocket: rendezvous paired, settling both sides");
    parked.done.settle(Ok(parked.value.clone()));
    reader.settle(Ok(parked.value));
}
