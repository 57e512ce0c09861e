//! Sport -> league -> teams browsing with client-side paging.

use super::{FlowSettings, TaskSlot, lock, publish};
use crate::core::failure::{ClassifiedFailure, UiMessage};
use crate::core::load_state::LoadState;
use crate::core::models::Team;
use crate::core::paging::{Page, PagingController};
use crate::core::services::league_service::LeagueService;
use crate::core::services::team_service::TeamService;
use crate::core::sports;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Everything shown once a sport is chosen
#[derive(Debug, Clone, PartialEq)]
pub struct SportSelection {
    pub sport: String,
    pub leagues: LoadState<Vec<String>>,
    /// League whose teams are shown; `None` until one is picked
    pub league: Option<String>,
    /// `Idle` while no league is selected
    pub teams: LoadState<Page<Team>>,
}

impl SportSelection {
    fn new(sport: String, leagues: LoadState<Vec<String>>) -> Self {
        Self {
            sport,
            leagues,
            league: None,
            teams: LoadState::Idle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LeaguesState {
    #[default]
    Idle,
    SportSelected(SportSelection),
}

impl LeaguesState {
    pub fn selection(&self) -> Option<&SportSelection> {
        match self {
            LeaguesState::SportSelected(selection) => Some(selection),
            LeaguesState::Idle => None,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut SportSelection> {
        match self {
            LeaguesState::SportSelected(selection) => Some(selection),
            LeaguesState::Idle => None,
        }
    }
}

/// State holder for the leagues screen.
///
/// League fetches and team fetches are independent streams; each keeps at
/// most one task alive. Dropping the flow aborts both.
pub struct LeaguesFlow {
    leagues: LeagueService,
    teams: TeamService,
    state: Arc<watch::Sender<LeaguesState>>,
    paging: Arc<Mutex<PagingController<Team>>>,
    league_task: TaskSlot,
    team_task: TaskSlot,
}

impl LeaguesFlow {
    pub fn new(leagues: LeagueService, teams: TeamService, settings: FlowSettings) -> Self {
        let (state, _) = watch::channel(LeaguesState::Idle);
        Self {
            leagues,
            teams,
            state: Arc::new(state),
            paging: Arc::new(Mutex::new(PagingController::new(
                settings.initial_page_size,
                settings.load_more_size,
            ))),
            league_task: TaskSlot::new("league list"),
            team_task: TaskSlot::new("team list"),
        }
    }

    pub fn sports(&self) -> Vec<&'static str> {
        sports::sports()
    }

    pub fn state(&self) -> LeaguesState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LeaguesState> {
        self.state.subscribe()
    }

    /// Choose a sport; choosing the selected sport again returns to `Idle`
    pub fn select_sport(&mut self, sport: &str) {
        let sport = sport.trim().to_string();
        self.league_task.cancel();
        self.team_task.cancel();
        lock(&self.paging).clear();

        let reselected = self
            .state
            .borrow()
            .selection()
            .is_some_and(|s| s.sport.eq_ignore_ascii_case(&sport));
        if reselected {
            log::debug!("Sport {} deselected", sport);
            self.state.send_replace(LeaguesState::Idle);
            return;
        }

        self.load_leagues(sport);
    }

    /// Fetch teams for `league` within the selected sport
    pub fn select_league(&mut self, league: &str) {
        let league = league.trim().to_string();
        if self.state.borrow().selection().is_none() {
            log::warn!("Ignoring league {} with no sport selected", league);
            return;
        }

        let ticket = self.team_task.begin();
        lock(&self.paging).clear();
        self.state.send_modify(|s| {
            if let Some(selection) = s.selection_mut() {
                selection.league = Some(league.clone());
                selection.teams = LoadState::Loading;
            }
        });

        let teams = self.teams.clone();
        let state = Arc::clone(&self.state);
        let paging = Arc::clone(&self.paging);
        let handle = tokio::spawn(async move {
            let result = teams.search_by_league(&league).await;
            if let Err(e) = &result {
                log::warn!("Loading teams for {} failed: {}", league, e);
            }

            publish(&*state, &ticket, |s| {
                let Some(selection) = s.selection_mut() else {
                    return false;
                };
                if selection.league.as_deref() != Some(league.as_str()) {
                    return false;
                }
                selection.teams = match result {
                    Ok(teams) if teams.is_empty() => LoadState::Empty(UiMessage::NO_TEAMS),
                    Ok(teams) => LoadState::Loaded(lock(&paging).reset(teams)),
                    Err(e) => LoadState::Error(ClassifiedFailure::from_error(&e)),
                };
                true
            });
        });
        self.team_task.attach(handle);
    }

    /// Reveal the next page of teams. Returns whether anything changed.
    pub fn load_more(&mut self) -> bool {
        let paging = Arc::clone(&self.paging);
        self.state.send_if_modified(|s| {
            let Some(selection) = s.selection_mut() else {
                return false;
            };
            match &mut selection.teams {
                LoadState::Loaded(page) if page.has_more => {
                    *page = lock(&paging).load_more();
                    true
                }
                _ => false,
            }
        })
    }

    /// Re-run the team fetch for the selected league
    pub fn retry_teams(&mut self) {
        let league = self.state.borrow().selection().and_then(|s| s.league.clone());
        if let Some(league) = league {
            self.select_league(&league);
        }
    }

    /// Re-run the league fetch for the selected sport
    pub fn retry_leagues(&mut self) {
        let sport = self.state.borrow().selection().map(|s| s.sport.clone());
        if let Some(sport) = sport {
            self.league_task.cancel();
            self.team_task.cancel();
            lock(&self.paging).clear();
            self.load_leagues(sport);
        }
    }

    /// Wait for outstanding league and team fetches, then return the state
    pub async fn settle(&mut self) -> LeaguesState {
        self.league_task.finished().await;
        self.team_task.finished().await;
        self.state()
    }

    fn load_leagues(&mut self, sport: String) {
        if let Some(names) = sports::static_leagues(&sport) {
            let leagues = if names.is_empty() {
                LoadState::Empty(UiMessage::NO_LEAGUES)
            } else {
                LoadState::Loaded(names.iter().map(|s| s.to_string()).collect())
            };
            self.state
                .send_replace(LeaguesState::SportSelected(SportSelection::new(sport, leagues)));
            return;
        }

        let ticket = self.league_task.begin();
        self.state.send_replace(LeaguesState::SportSelected(SportSelection::new(
            sport.clone(),
            LoadState::Loading,
        )));

        let leagues = self.leagues.clone();
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let result = leagues.leagues_for_sport(&sport).await;
            if let Err(e) = &result {
                log::warn!("Loading leagues for {} failed: {}", sport, e);
            }
            let next = LoadState::from_result(result, Vec::is_empty, UiMessage::NO_LEAGUES);

            publish(&*state, &ticket, |s| match s.selection_mut() {
                Some(selection) if selection.sport == sport => {
                    selection.leagues = next;
                    true
                }
                _ => false,
            });
        });
        self.league_task.attach(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::failure::FailureCategory;
    use crate::core::models::League;
    use crate::core::services::team_service::tests::{FakeTeams, network_error};
    use crate::core::services::traits::LeaguesRemote;
    use crate::storage::favorites::InMemoryFavoritesStore;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FakeLeagues;

    #[async_trait]
    impl LeaguesRemote for FakeLeagues {
        async fn fetch_all_leagues(&self) -> crate::Result<Vec<League>> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(vec![League {
                id: "4380".to_string(),
                name: "NHL".to_string(),
                sport: Some("Ice Hockey".to_string()),
                alternate_name: None,
            }])
        }
    }

    const EPL: &str = "English Premier League";
    const LIGA: &str = "Spanish La Liga";

    fn teams(prefix: &str, count: usize) -> Vec<Team> {
        (1..=count)
            .map(|i| Team::new(format!("{prefix}{i}"), format!("{prefix} team {i}")))
            .collect()
    }

    fn flow(remote: FakeTeams) -> LeaguesFlow {
        let settings = FlowSettings {
            initial_page_size: 8,
            load_more_size: 8,
            ..FlowSettings::default()
        };
        LeaguesFlow::new(
            LeagueService::new(Arc::new(FakeLeagues)),
            TeamService::new(Arc::new(remote), Arc::new(InMemoryFavoritesStore::new())),
            settings,
        )
    }

    async fn settled_teams(flow: &LeaguesFlow) -> LoadState<Page<Team>> {
        let mut rx = flow.subscribe();
        let state = rx
            .wait_for(|s| s.selection().is_some_and(|sel| sel.teams.is_terminal()))
            .await
            .expect("flow alive");
        state.selection().map(|sel| sel.teams.clone()).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_selecting_same_sport_twice_returns_to_idle() {
        let mut flow = flow(FakeTeams::default());
        flow.select_sport("Soccer");
        assert!(flow.state().selection().is_some());

        flow.select_sport("Soccer");
        assert_eq!(flow.state(), LeaguesState::Idle);
    }

    #[tokio::test]
    async fn test_static_sport_lists_leagues_immediately() {
        let mut flow = flow(FakeTeams::default());
        flow.select_sport("Basketball");

        let state = flow.state();
        let selection = state.selection().expect("sport selected");
        assert_eq!(
            selection.leagues.data(),
            Some(&vec!["NBA".to_string(), "FIBA Basketball World Cup".to_string()])
        );
        assert!(selection.teams.is_idle());
        assert!(selection.league.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_sport_loads_leagues() {
        let mut flow = flow(FakeTeams::default());
        flow.select_sport("Ice Hockey");
        assert!(flow.state().selection().expect("selected").leagues.is_loading());

        let mut rx = flow.subscribe();
        let state = rx
            .wait_for(|s| s.selection().is_some_and(|sel| sel.leagues.is_terminal()))
            .await
            .expect("flow alive")
            .clone();
        assert_eq!(
            state.selection().expect("selected").leagues.data(),
            Some(&vec!["NHL".to_string()])
        );
    }

    #[tokio::test]
    async fn test_team_paging_reveals_in_place() {
        let mut flow = flow(FakeTeams::default().with_league(EPL, Ok(teams("epl", 20))));
        flow.select_sport("Soccer");
        flow.select_league(EPL);

        let page = settled_teams(&flow).await;
        let page = page.data().expect("teams loaded");
        assert_eq!(page.shown.len(), 8);
        assert!(page.has_more);

        assert!(flow.load_more());
        let state = flow.state();
        let page = state.selection().and_then(|s| s.teams.data()).expect("loaded");
        assert_eq!(page.shown.len(), 16);
        assert!(page.has_more);

        assert!(flow.load_more());
        let state = flow.state();
        let page = state.selection().and_then(|s| s.teams.data()).expect("loaded");
        assert_eq!(page.shown.len(), 20);
        assert!(!page.has_more);
        assert_eq!(page.shown, page.all);

        assert!(!flow.load_more());
    }

    #[tokio::test]
    async fn test_empty_league_shows_empty_state() {
        let mut flow = flow(FakeTeams::default());
        flow.select_sport("Soccer");
        flow.select_league(LIGA);

        assert_eq!(settled_teams(&flow).await, LoadState::Empty(UiMessage::NO_TEAMS));
    }

    #[tokio::test]
    async fn test_failed_league_is_classified_and_retryable() {
        let remote = FakeTeams::default().with_league(EPL, Err(network_error()));
        let mut flow = flow(remote);
        flow.select_sport("Soccer");
        flow.select_league(EPL);

        let teams = settled_teams(&flow).await;
        let failure = teams.failure().expect("error state");
        assert_eq!(failure.category, FailureCategory::NoConnectivity);
        assert!(failure.ui.action.is_some());

        flow.retry_teams();
        assert!(flow.state().selection().expect("selected").teams.is_loading());
        assert!(settled_teams(&flow).await.is_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_league_result_is_discarded() {
        let remote = FakeTeams::default()
            .with_league(EPL, Ok(teams("epl", 3)))
            .with_delay(EPL, Duration::from_secs(5))
            .with_league(LIGA, Ok(teams("liga", 2)));
        let mut flow = flow(remote);
        flow.select_sport("Soccer");
        flow.select_league(EPL);
        flow.select_league(LIGA);

        let teams = settled_teams(&flow).await;
        assert_eq!(teams.data().expect("loaded").all.len(), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = flow.state();
        let selection = state.selection().expect("selected");
        assert_eq!(selection.league.as_deref(), Some(LIGA));
        assert_eq!(selection.teams.data().expect("loaded").all[0].id, "liga1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deselecting_sport_cancels_team_fetch() {
        let remote = FakeTeams::default()
            .with_league(EPL, Ok(teams("epl", 3)))
            .with_delay(EPL, Duration::from_secs(5));
        let mut flow = flow(remote);
        flow.select_sport("Soccer");
        flow.select_league(EPL);
        flow.select_sport("Soccer");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(flow.state(), LeaguesState::Idle);
    }

    #[tokio::test]
    async fn test_league_without_sport_is_ignored() {
        let remote = FakeTeams::default();
        let mut flow = flow(remote);
        flow.select_league(EPL);
        assert_eq!(flow.state(), LeaguesState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_returns_final_teams() {
        let remote = FakeTeams::default()
            .with_league(EPL, Ok(teams("epl", 12)))
            .with_delay(EPL, Duration::from_secs(2));
        let mut flow = flow(remote);
        flow.select_sport("Soccer");
        flow.select_league(EPL);

        let state = flow.settle().await;
        let page = state
            .selection()
            .and_then(|s| s.teams.data())
            .expect("teams loaded");
        assert_eq!(page.shown.len(), 8);
        assert_eq!(page.total_len(), 12);
    }
}
