//! Test subscriber — records every published event.

use std::sync::{Arc, Mutex};

use branchline_core::event::{DomainEvent, EventSubscriber};

/// An event subscriber that stores every event it is notified of.
///
/// Clones share the same log, so a test can hand one clone to the code
/// under test and inspect the other.
#[derive(Debug)]
pub struct RecordingSubscriber<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E> RecordingSubscriber<E> {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<E: Clone> RecordingSubscriber<E> {
    /// Returns a snapshot of all recorded events.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn recorded_events(&self) -> Vec<E> {
        self.events.lock().unwrap().clone()
    }
}

impl<E> Clone for RecordingSubscriber<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E> Default for RecordingSubscriber<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventSubscriber<E> for RecordingSubscriber<E>
where
    E: DomainEvent + Clone,
{
    fn notify(&self, event: &E) {
        self.events.lock().unwrap().push(event.clone());
    }
}
