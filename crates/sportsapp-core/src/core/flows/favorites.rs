use super::TaskSlot;
use crate::Result;
use crate::core::failure::UiMessage;
use crate::core::models::Team;
use crate::core::services::team_service::TeamService;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FavoritesView {
    #[default]
    Loading,
    Empty(UiMessage),
    List(Vec<Team>),
}

impl FavoritesView {
    pub fn teams(&self) -> &[Team] {
        match self {
            FavoritesView::List(teams) => teams,
            _ => &[],
        }
    }
}

/// Live view of followed teams, ordered by name
pub struct FavoritesFlow {
    teams: TeamService,
    state: Arc<watch::Sender<FavoritesView>>,
    _observer: TaskSlot,
}

impl FavoritesFlow {
    pub fn new(teams: TeamService) -> Self {
        let (state, _) = watch::channel(FavoritesView::Loading);
        let state = Arc::new(state);

        let mut favorites = teams.observe_favorites();
        let sink = Arc::clone(&state);
        let mut observer = TaskSlot::new("favorites");
        observer.attach(tokio::spawn(async move {
            while let Some(list) = favorites.next().await {
                let view = if list.is_empty() {
                    FavoritesView::Empty(UiMessage::NO_FAVORITES)
                } else {
                    FavoritesView::List(list)
                };
                sink.send_replace(view);
            }
        }));

        Self {
            teams,
            state,
            _observer: observer,
        }
    }

    pub fn state(&self) -> FavoritesView {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FavoritesView> {
        self.state.subscribe()
    }

    pub async fn unfollow(&self, id: &str) -> Result<()> {
        self.teams.unfollow(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::team_service::tests::FakeTeams;
    use crate::storage::favorites::InMemoryFavoritesStore;

    #[tokio::test]
    async fn test_favorites_view_tracks_store() {
        let teams = TeamService::new(
            Arc::new(FakeTeams::default()),
            Arc::new(InMemoryFavoritesStore::new()),
        );
        let flow = FavoritesFlow::new(teams.clone());
        let mut rx = flow.subscribe();

        rx.wait_for(|v| matches!(v, FavoritesView::Empty(_)))
            .await
            .expect("flow alive");

        teams
            .follow(Team::new("2", "Chelsea"))
            .await
            .expect("follow chelsea");
        teams
            .follow(Team::new("1", "Arsenal"))
            .await
            .expect("follow arsenal");

        let view = rx
            .wait_for(|v| v.teams().len() == 2)
            .await
            .expect("flow alive")
            .clone();
        let names: Vec<_> = view.teams().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Arsenal", "Chelsea"]);

        flow.unfollow("1").await.expect("unfollow");
        flow.unfollow("2").await.expect("unfollow");
        rx.wait_for(|v| *v == FavoritesView::Empty(UiMessage::NO_FAVORITES))
            .await
            .expect("flow alive");
    }
}
