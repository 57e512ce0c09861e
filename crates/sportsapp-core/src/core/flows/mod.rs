//! State holders driving the app's screens.
//!
//! Each flow publishes its state through a `watch` channel and owns at most
//! one in-flight task per logical stream. Starting new work for a stream
//! aborts the previous task and bumps the stream's generation, so a result
//! computed by superseded work is never published.

pub mod favorites;
pub mod leagues;
pub mod search;
pub mod team_detail;

use crate::core::paging::{DEFAULT_INITIAL_SIZE, DEFAULT_LOAD_MORE_SIZE};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use favorites::{FavoritesFlow, FavoritesView};
pub use leagues::{LeaguesFlow, LeaguesState, SportSelection};
pub use search::{SearchFlow, SearchState, SearchStatus};
pub use team_detail::{TeamDetailFlow, TeamDetailState};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 3;

/// Tunables shared by the flows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSettings {
    pub initial_page_size: usize,
    pub load_more_size: usize,
    pub search_debounce: Duration,
    pub min_query_length: usize,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            initial_page_size: DEFAULT_INITIAL_SIZE,
            load_more_size: DEFAULT_LOAD_MORE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
        }
    }
}

/// Proof that a unit of work is still the latest for its stream
#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    id: u64,
    generation: Arc<AtomicU64>,
}

impl Ticket {
    pub(crate) fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }
}

/// Apply `update` only if `ticket` is still current.
///
/// The ticket is checked under the channel's write lock, so a cancelled
/// unit of work can never overwrite state published after the cancel.
pub(crate) fn publish<S>(
    state: &watch::Sender<S>,
    ticket: &Ticket,
    update: impl FnOnce(&mut S) -> bool,
) -> bool {
    state.send_if_modified(|s| {
        if !ticket.is_current() {
            log::debug!("Dropping result of superseded work");
            return false;
        }
        update(s)
    })
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-flight slot for one logical stream
#[derive(Debug)]
pub(crate) struct TaskSlot {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

impl TaskSlot {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invalidate outstanding tickets and abort the running task
    pub(crate) fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                log::debug!("Cancelling in-flight {} task", self.name);
            }
            handle.abort();
        }
    }

    /// Cancel prior work and hand out a ticket for the next unit
    pub(crate) fn begin(&mut self) -> Ticket {
        self.cancel();
        Ticket {
            id: self.generation.load(Ordering::SeqCst),
            generation: Arc::clone(&self.generation),
        }
    }

    pub(crate) fn attach(&mut self, handle: JoinHandle<()>) {
        self.handle = Some(handle);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Hand the task over to a caller that wants to await it
    pub(crate) fn detach(&mut self) -> Option<JoinHandle<()>> {
        self.handle.take()
    }

    /// Wait for the running task, if any, to complete
    pub(crate) async fn finished(&mut self) {
        if let Some(handle) = self.detach() {
            join_task(self.name, handle).await;
        }
    }
}

pub(crate) async fn join_task(name: &str, handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        if e.is_panic() {
            log::error!("{} task panicked", name);
        }
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FlowSettings::default();
        assert_eq!(settings.initial_page_size, 10);
        assert_eq!(settings.load_more_size, 4);
        assert_eq!(settings.search_debounce, Duration::from_millis(300));
        assert_eq!(settings.min_query_length, 3);
    }

    #[test]
    fn test_begin_invalidates_older_tickets() {
        let mut slot = TaskSlot::new("test");
        let first = slot.begin();
        assert!(first.is_current());

        let second = slot.begin();
        assert!(!first.is_current());
        assert!(second.is_current());

        slot.cancel();
        assert!(!second.is_current());
    }

    #[tokio::test]
    async fn test_cancel_aborts_running_task() {
        let mut slot = TaskSlot::new("test");
        let _ticket = slot.begin();
        slot.attach(tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }));
        assert!(slot.is_running());

        slot.cancel();
        assert!(!slot.is_running());
    }

    #[tokio::test]
    async fn test_finished_waits_for_task() {
        let mut slot = TaskSlot::new("test");
        let (tx, rx) = watch::channel(0);
        let ticket = slot.begin();
        slot.attach(tokio::spawn(async move {
            tokio::task::yield_now().await;
            publish(&tx, &ticket, |v| {
                *v = 1;
                true
            });
        }));

        slot.finished().await;
        assert!(!slot.is_running());
        assert_eq!(*rx.borrow(), 1);
        // Nothing left to wait for
        slot.finished().await;
    }
}
