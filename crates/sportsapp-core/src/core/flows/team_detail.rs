//! Team detail with live follow state.

use super::{TaskSlot, publish};
use crate::Result;
use crate::core::failure::{ClassifiedFailure, FailureCategory};
use crate::core::load_state::LoadState;
use crate::core::models::Team;
use crate::core::services::team_service::TeamService;
use futures::StreamExt;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamDetailState {
    /// Name the current load was started with
    pub name: Option<String>,
    pub team: LoadState<Team>,
    /// Whether the shown team is in the favorites table
    pub is_followed: bool,
}

pub struct TeamDetailFlow {
    teams: TeamService,
    state: Arc<watch::Sender<TeamDetailState>>,
    load_task: TaskSlot,
    follow_task: TaskSlot,
}

impl TeamDetailFlow {
    pub fn new(teams: TeamService) -> Self {
        let (state, _) = watch::channel(TeamDetailState::default());
        Self {
            teams,
            state: Arc::new(state),
            load_task: TaskSlot::new("team detail"),
            follow_task: TaskSlot::new("follow state"),
        }
    }

    pub fn state(&self) -> TeamDetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TeamDetailState> {
        self.state.subscribe()
    }

    /// Show the team called `name`: cached favorite first, then the network
    pub fn load(&mut self, name: &str) {
        let name = name.trim().to_string();
        let ticket = self.load_task.begin();
        self.state.send_modify(|s| {
            s.name = Some(name.clone());
            s.team = LoadState::Loading;
            s.is_followed = false;
        });
        self.watch_follow_state();

        let teams = self.teams.clone();
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let mut lookup = teams.get_team_by_name(&name);
            while let Some(item) = lookup.next().await {
                let next = match item {
                    Ok(Some(team)) => LoadState::Loaded(team),
                    Ok(None) => {
                        log::info!("No team named {:?}", name);
                        LoadState::Error(ClassifiedFailure::from_category(FailureCategory::NotFound))
                    }
                    Err(e) => {
                        log::warn!("Loading team {:?} failed: {}", name, e);
                        LoadState::Error(ClassifiedFailure::from_error(&e))
                    }
                };

                publish(&*state, &ticket, |s| {
                    s.team = next;
                    true
                });
            }
        });
        self.load_task.attach(handle);
    }

    /// Wait until the cache and network lookups have both reported
    pub async fn settle(&mut self) -> TeamDetailState {
        self.load_task.finished().await;
        self.state()
    }

    pub fn retry(&mut self) {
        let name = self.state.borrow().name.clone();
        if let Some(name) = name {
            self.load(&name);
        }
    }

    /// Follow the shown team, or unfollow it if already followed.
    ///
    /// Returns the new follow state, or `None` when no team is shown.
    pub async fn toggle_follow(&self) -> Result<Option<bool>> {
        let team = self.state.borrow().team.data().cloned();
        let Some(team) = team else {
            return Ok(None);
        };

        if self.teams.is_followed(&team.id).await? {
            self.teams.unfollow(&team.id).await?;
            Ok(Some(false))
        } else {
            self.teams.follow(team).await?;
            Ok(Some(true))
        }
    }

    /// Keep `is_followed` in sync with both the shown team and the store
    fn watch_follow_state(&mut self) {
        if self.follow_task.is_running() {
            return;
        }

        let mut ids = self.teams.observe_favorite_ids();
        let mut shown = self.state.subscribe();
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let mut followed: BTreeSet<String> = BTreeSet::new();
            loop {
                let id = shown.borrow_and_update().team.data().map(|t| t.id.clone());
                let is_followed = id.is_some_and(|id| followed.contains(&id));
                state.send_if_modified(|s| {
                    let changed = s.is_followed != is_followed;
                    s.is_followed = is_followed;
                    changed
                });

                tokio::select! {
                    next = ids.next() => match next {
                        Some(set) => followed = set,
                        None => break,
                    },
                    changed = shown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        self.follow_task.attach(handle);
    }
}
