use crate::cli::main_types::ConfigCommands;
use futures::StreamExt;
use sportsapp_core::core::failure::{ClassifiedFailure, UiMessage};
use sportsapp_core::core::flows::{
    FavoritesFlow, FavoritesView, LeaguesFlow, SearchFlow, SearchStatus, TeamDetailFlow,
};
use sportsapp_core::core::load_state::LoadState;
use sportsapp_core::core::services::config_service::ConfigService;
use sportsapp_core::core::services::team_service::TeamService;
use sportsapp_core::display::TableDisplay;
use sportsapp_core::error::{AppError, CliError, StorageError};
use sportsapp_core::storage::config::Config;
use sportsapp_core::utils::logging::print_verbose;
use sportsapp_core::utils::validation::validate_search_query;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Print a classified failure and hand back an error that is not printed again
fn report(display: &TableDisplay, failure: &ClassifiedFailure) -> AppError {
    eprint!("{}", display.render_message(&failure.ui, true));
    log::debug!("{:?}: {}", failure.category, failure.detail);
    AppError::Cli(CliError::Reported(failure.ui.title.to_string()))
}

fn show_empty(display: &TableDisplay, ui: &UiMessage) {
    print!("{}", display.render_message(ui, false));
}

async fn followed_ids(teams: &TeamService) -> BTreeSet<String> {
    teams
        .observe_favorite_ids()
        .next()
        .await
        .unwrap_or_default()
}

/// Sports, leagues and per-league team lists
pub struct BrowseHandler {
    display: TableDisplay,
}

impl BrowseHandler {
    pub fn new() -> Self {
        Self {
            display: TableDisplay::new(),
        }
    }

    pub fn sports(&self, flow: &LeaguesFlow) {
        let rows: Vec<Vec<String>> = flow
            .sports()
            .into_iter()
            .map(|s| vec![s.to_string()])
            .collect();
        println!("{}", self.display.render_simple_table(&["Sport"], &rows));
    }

    pub async fn leagues(&self, flow: &mut LeaguesFlow, sport: &str) -> Result<(), AppError> {
        let leagues = self.load_leagues(flow, sport).await?;
        if let Some(leagues) = leagues {
            println!("{}", self.display.render_league_list(sport, &leagues));
        }
        Ok(())
    }

    pub async fn teams(
        &self,
        flow: &mut LeaguesFlow,
        teams: &TeamService,
        sport: &str,
        league: &str,
        more: usize,
    ) -> Result<(), AppError> {
        let leagues = self.load_leagues(flow, sport).await?;
        let known = leagues
            .as_deref()
            .is_some_and(|l| l.iter().any(|name| name.eq_ignore_ascii_case(league)));
        if !known {
            log::warn!("{} is not a listed {} league", league, sport);
        }

        flow.select_league(league);
        flow.settle().await;
        for _ in 0..more {
            if !flow.load_more() {
                break;
            }
        }

        let state = flow.state();
        let Some(selection) = state.selection() else {
            return Ok(());
        };
        match &selection.teams {
            LoadState::Loaded(page) => {
                let followed = followed_ids(teams).await;
                println!("{}", self.display.render_team_page(page, &followed));
            }
            LoadState::Empty(ui) => show_empty(&self.display, ui),
            LoadState::Error(failure) => return Err(report(&self.display, failure)),
            LoadState::Idle | LoadState::Loading => {}
        }
        Ok(())
    }

    /// Select `sport` and wait for its leagues; `None` when there are none
    async fn load_leagues(
        &self,
        flow: &mut LeaguesFlow,
        sport: &str,
    ) -> Result<Option<Vec<String>>, AppError> {
        flow.select_sport(sport);
        let state = flow.settle().await;
        let Some(selection) = state.selection() else {
            return Ok(None);
        };

        match &selection.leagues {
            LoadState::Loaded(leagues) => Ok(Some(leagues.clone())),
            LoadState::Empty(ui) => {
                show_empty(&self.display, ui);
                Ok(None)
            }
            LoadState::Error(failure) => Err(report(&self.display, failure)),
            LoadState::Idle | LoadState::Loading => Ok(None),
        }
    }
}

impl Default for BrowseHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SearchHandler {
    display: TableDisplay,
}

impl SearchHandler {
    pub fn new() -> Self {
        Self {
            display: TableDisplay::new(),
        }
    }

    pub async fn handle(
        &self,
        mut flow: SearchFlow,
        teams: &TeamService,
        query: &str,
        min_query_length: usize,
    ) -> Result<(), AppError> {
        flow.submit(query);
        let state = flow.settle().await;

        match &state.status {
            SearchStatus::Success(results) => {
                let followed = followed_ids(teams).await;
                println!("{}", self.display.render_team_list(results, &followed));
                println!("{} teams match {:?}", results.len(), query.trim());
                Ok(())
            }
            SearchStatus::Empty(ui) => {
                show_empty(&self.display, ui);
                Ok(())
            }
            SearchStatus::InvalidQuery(ui) => {
                eprint!("{}", self.display.render_message(ui, true));
                validate_search_query(query, min_query_length)
            }
            SearchStatus::Error(failure) => Err(report(&self.display, failure)),
            SearchStatus::Idle | SearchStatus::Loading => Err(AppError::Cli(
                CliError::InvalidArguments("Search query is empty".to_string()),
            )),
        }
    }
}

impl Default for SearchHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Team detail, follow and unfollow
pub struct TeamHandler {
    display: TableDisplay,
}

impl TeamHandler {
    pub fn new() -> Self {
        Self {
            display: TableDisplay::new(),
        }
    }

    pub async fn show(
        &self,
        mut flow: TeamDetailFlow,
        teams: &TeamService,
        name: &str,
    ) -> Result<(), AppError> {
        flow.load(name);
        let state = flow.settle().await;

        match &state.team {
            LoadState::Loaded(team) => {
                let followed = teams.is_followed(&team.id).await?;
                println!("{}", self.display.render_team_detail(team, followed));
                Ok(())
            }
            LoadState::Error(failure) => Err(report(&self.display, failure)),
            LoadState::Empty(ui) => {
                show_empty(&self.display, ui);
                Ok(())
            }
            LoadState::Idle | LoadState::Loading => Ok(()),
        }
    }

    pub async fn follow(
        &self,
        mut flow: TeamDetailFlow,
        teams: &TeamService,
        name: &str,
    ) -> Result<(), AppError> {
        flow.load(name);
        let state = flow.settle().await;

        let team = match &state.team {
            LoadState::Loaded(team) => team,
            LoadState::Error(failure) => return Err(report(&self.display, failure)),
            _ => {
                return Err(AppError::Cli(CliError::TeamNotFound {
                    name: name.to_string(),
                }));
            }
        };

        if teams.is_followed(&team.id).await? {
            println!("★ Already following {}", team.name);
            return Ok(());
        }

        if flow.toggle_follow().await? == Some(true) {
            println!("★ Following {} ({})", team.name, team.id);
        }
        Ok(())
    }

    pub async fn unfollow(
        &self,
        flow: &FavoritesFlow,
        teams: &TeamService,
        id: &str,
    ) -> Result<(), AppError> {
        let id = id.trim();
        if !teams.is_followed(id).await? {
            return Err(AppError::Cli(CliError::TeamNotFound {
                name: id.to_string(),
            }));
        }

        flow.unfollow(id).await?;
        println!("Unfollowed team {}", id);
        Ok(())
    }
}

impl Default for TeamHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FavoritesHandler {
    display: TableDisplay,
}

impl FavoritesHandler {
    pub fn new() -> Self {
        Self {
            display: TableDisplay::new(),
        }
    }

    pub async fn handle(&self, flow: &FavoritesFlow) -> Result<(), AppError> {
        let mut rx = flow.subscribe();
        let view = rx
            .wait_for(|v| !matches!(v, FavoritesView::Loading))
            .await
            .map_err(|_| StorageError::Task {
                message: "favorites view closed".to_string(),
            })?
            .clone();

        match view {
            FavoritesView::List(teams) => {
                let followed: BTreeSet<String> = teams.iter().map(|t| t.id.clone()).collect();
                println!("{}", self.display.render_team_list(&teams, &followed));
                println!("{} followed teams", teams.len());
            }
            FavoritesView::Empty(ui) => show_empty(&self.display, &ui),
            FavoritesView::Loading => {}
        }
        Ok(())
    }
}

impl Default for FavoritesHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config_service: &mut ConfigService,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                print_verbose(verbose, "Showing effective configuration");

                let file = match &config_path {
                    Some(path) => path.display().to_string(),
                    None => Config::config_file_path()?.display().to_string(),
                };
                println!("Config file: {}", file);
                println!(
                    "{}",
                    TableDisplay::new().render_config(&config_service.entries())
                );
                Ok(())
            }
            ConfigCommands::Set { url, api_key, db } => {
                print_verbose(
                    verbose,
                    &format!(
                        "Attempting config set - url: {:?}, db: {:?}, api key given: {}",
                        url,
                        db,
                        api_key.is_some()
                    ),
                );

                let mut updated_fields = Vec::new();
                if let Some(url) = url {
                    config_service.set_field("url", &url)?;
                    updated_fields.push(format!("URL to: {}", url));
                }
                if let Some(api_key) = api_key {
                    config_service.set_field("api-key", &api_key)?;
                    updated_fields.push("API key".to_string());
                }
                if let Some(db) = db {
                    config_service.set_field("db", &db)?;
                    updated_fields.push(format!("database to: {}", db));
                }

                if updated_fields.is_empty() {
                    return Err(AppError::Cli(CliError::InvalidArguments(
                        "No configuration values provided. Use --url, --api-key and/or --db"
                            .to_string(),
                    )));
                }

                config_service.save_config(config_path)?;
                println!("✅ Set {}", updated_fields.join(", "));
                println!("Configuration saved successfully.");
                Ok(())
            }
        }
    }
}
