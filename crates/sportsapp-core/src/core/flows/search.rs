//! Debounced team search.

use super::{FlowSettings, TaskSlot, join_task, lock, publish};
use crate::core::failure::{ClassifiedFailure, UiMessage};
use crate::core::models::Team;
use crate::core::services::team_service::TeamService;
use crate::utils::validation::is_valid_search_query;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    /// Rejected client-side; no request was made
    InvalidQuery(UiMessage),
    Loading,
    Success(Vec<Team>),
    Empty(UiMessage),
    Error(ClassifiedFailure),
}

impl SearchStatus {
    /// Outcome of a fetch
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchStatus::Success(_) | SearchStatus::Empty(_) | SearchStatus::Error(_)
        )
    }

    pub fn results(&self) -> Option<&[Team]> {
        match self {
            SearchStatus::Success(teams) => Some(teams),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    /// Raw text as typed
    pub query: String,
    pub status: SearchStatus,
}

/// Starts searches for settled queries; shared with the debounce task
#[derive(Clone)]
struct Launcher {
    teams: TeamService,
    state: Arc<watch::Sender<SearchState>>,
    search_task: Arc<Mutex<TaskSlot>>,
    last_settled: Arc<Mutex<Option<String>>>,
}

impl Launcher {
    fn launch(&self, query: String, force: bool) {
        {
            let mut last = lock(&self.last_settled);
            if !force && last.as_deref() == Some(query.as_str()) {
                log::debug!("Query {:?} unchanged, not searching again", query);
                return;
            }
            *last = Some(query.clone());
        }

        let mut slot = lock(&self.search_task);
        let ticket = slot.begin();
        self.state.send_modify(|s| s.status = SearchStatus::Loading);

        let teams = self.teams.clone();
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let result = teams.search(&query).await;
            if let Err(e) = &result {
                log::warn!("Search for {:?} failed: {}", query, e);
            }

            publish(&*state, &ticket, |s| {
                s.status = match result {
                    Ok(teams) if teams.is_empty() => SearchStatus::Empty(UiMessage::NO_RESULTS),
                    Ok(teams) => SearchStatus::Success(teams),
                    Err(e) => SearchStatus::Error(ClassifiedFailure::from_error(&e)),
                };
                true
            });
        });
        slot.attach(handle);
    }

    fn cancel(&self) {
        lock(&self.search_task).cancel();
        *lock(&self.last_settled) = None;
    }
}

/// State holder for the search screen.
///
/// Keystrokes restart the debounce timer; a query that survives the timer
/// replaces any in-flight search. Invalid or blank input cancels both.
pub struct SearchFlow {
    settings: FlowSettings,
    launcher: Launcher,
    debounce_task: TaskSlot,
}

impl SearchFlow {
    pub fn new(teams: TeamService, settings: FlowSettings) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            settings,
            launcher: Launcher {
                teams,
                state: Arc::new(state),
                search_task: Arc::new(Mutex::new(TaskSlot::new("search"))),
                last_settled: Arc::new(Mutex::new(None)),
            },
            debounce_task: TaskSlot::new("search debounce"),
        }
    }

    pub fn state(&self) -> SearchState {
        self.launcher.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.launcher.state.subscribe()
    }

    /// Record a keystroke and schedule a search once typing pauses
    pub fn on_query_change(&mut self, text: &str) {
        if let Some(query) = self.accept(text) {
            let ticket = self.debounce_task.begin();
            let launcher = self.launcher.clone();
            let delay = self.settings.search_debounce;
            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if ticket.is_current() {
                    launcher.launch(query, false);
                }
            });
            self.debounce_task.attach(handle);
        }
    }

    /// Search for `text` right away, skipping the debounce window
    pub fn submit(&mut self, text: &str) {
        if let Some(query) = self.accept(text) {
            self.launcher.launch(query, true);
        }
    }

    /// Search the last settled query again
    pub fn retry(&mut self) {
        let last = lock(&self.launcher.last_settled).clone();
        if let Some(query) = last {
            self.debounce_task.cancel();
            self.launcher.launch(query, true);
        }
    }

    /// Wait for a pending debounce and the search it starts
    pub async fn settle(&mut self) -> SearchState {
        self.debounce_task.finished().await;
        let search = lock(&self.launcher.search_task).detach();
        if let Some(handle) = search {
            join_task("search", handle).await;
        }
        self.state()
    }

    /// Store the raw text and validate it; returns the query to search
    fn accept(&mut self, text: &str) -> Option<String> {
        self.debounce_task.cancel();
        let query = text.trim().to_string();

        let rejected = if query.is_empty() {
            Some(SearchStatus::Idle)
        } else if !is_valid_search_query(&query, self.settings.min_query_length) {
            Some(SearchStatus::InvalidQuery(UiMessage::INVALID_QUERY))
        } else {
            None
        };

        match rejected {
            Some(status) => {
                self.launcher.cancel();
                self.launcher.state.send_modify(|s| {
                    s.query = text.to_string();
                    s.status = status;
                });
                None
            }
            None => {
                self.launcher.state.send_modify(|s| s.query = text.to_string());
                Some(query)
            }
        }
    }
}

impl Drop for SearchFlow {
    fn drop(&mut self) {
        lock(&self.launcher.search_task).cancel();
    }
}
