use crate::cli::command_handlers::{
    BrowseHandler, ConfigHandler, FavoritesHandler, SearchHandler, TeamHandler,
};
use crate::cli::main_types::Commands;
use sportsapp_core::api::client::SportsDbClient;
use sportsapp_core::core::flows::{
    FavoritesFlow, FlowSettings, LeaguesFlow, SearchFlow, TeamDetailFlow,
};
use sportsapp_core::core::services::config_service::ConfigService;
use sportsapp_core::core::services::league_service::LeagueService;
use sportsapp_core::core::services::team_service::TeamService;
use sportsapp_core::core::services::traits::FavoritesStore;
use sportsapp_core::error::AppError;
use sportsapp_core::storage::config::Config;
use sportsapp_core::storage::favorites::{InMemoryFavoritesStore, SqliteFavoritesStore};
use sportsapp_core::utils::logging::print_verbose;
use std::path::PathBuf;
use std::sync::Arc;

/// Values given on the command line that win over env and config file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub no_persist: bool,
}

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    verbose: bool,
    overrides: Overrides,
}

impl Dispatcher {
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        verbose: bool,
        overrides: Overrides,
    ) -> Self {
        Self {
            config,
            config_path,
            verbose,
            overrides,
        }
    }

    fn effective_url(&self) -> String {
        non_empty(&self.overrides.url).unwrap_or_else(|| self.config.get_base_url())
    }

    fn effective_api_key(&self) -> String {
        non_empty(&self.overrides.api_key).unwrap_or_else(|| self.config.get_api_key())
    }

    fn create_client(&self) -> Result<Arc<SportsDbClient>, AppError> {
        let url = self.effective_url();
        self.log_verbose(&format!("Creating client for {}", url));
        Ok(Arc::new(SportsDbClient::new(url, self.effective_api_key())?))
    }

    fn create_favorites_store(&self) -> Result<Arc<dyn FavoritesStore>, AppError> {
        if self.overrides.no_persist {
            self.log_verbose("Keeping favorites in memory for this run");
            return Ok(Arc::new(InMemoryFavoritesStore::new()));
        }

        match self.config.get_database_path() {
            Some(path) => {
                self.log_verbose(&format!("Using favorites database {}", path.display()));
                Ok(Arc::new(SqliteFavoritesStore::open(&path)?))
            }
            None => {
                log::warn!("No data directory found; favorites will not be saved");
                Ok(Arc::new(InMemoryFavoritesStore::new()))
            }
        }
    }

    fn settings(&self) -> FlowSettings {
        self.config.flow_settings()
    }

    fn create_services(&self) -> Result<(TeamService, LeagueService), AppError> {
        let client = self.create_client()?;
        let favorites = self.create_favorites_store()?;
        Ok((
            TeamService::new(client.clone(), favorites),
            LeagueService::new(client),
        ))
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Config { command } => {
                let handler = ConfigHandler::new();
                let mut config_service = ConfigService::new(self.config.clone());
                handler.handle(
                    command,
                    &mut config_service,
                    self.config_path.clone(),
                    self.verbose,
                )
            }
            Commands::Sports => {
                let (teams, leagues) = self.create_services()?;
                let flow = LeaguesFlow::new(leagues, teams, self.settings());
                BrowseHandler::new().sports(&flow);
                Ok(())
            }
            Commands::Leagues { sport } => {
                let (teams, leagues) = self.create_services()?;
                let mut flow = LeaguesFlow::new(leagues, teams, self.settings());
                BrowseHandler::new().leagues(&mut flow, &sport).await
            }
            Commands::Teams {
                sport,
                league,
                more,
            } => {
                let (teams, leagues) = self.create_services()?;
                let mut flow = LeaguesFlow::new(leagues, teams.clone(), self.settings());
                BrowseHandler::new()
                    .teams(&mut flow, &teams, &sport, &league, more)
                    .await
            }
            Commands::Search { query } => {
                let (teams, _) = self.create_services()?;
                let settings = self.settings();
                let flow = SearchFlow::new(teams.clone(), settings);
                SearchHandler::new()
                    .handle(flow, &teams, &query, settings.min_query_length)
                    .await
            }
            Commands::Team { name } => {
                let (teams, _) = self.create_services()?;
                let flow = TeamDetailFlow::new(teams.clone());
                TeamHandler::new().show(flow, &teams, &name).await
            }
            Commands::Follow { name } => {
                let (teams, _) = self.create_services()?;
                let flow = TeamDetailFlow::new(teams.clone());
                TeamHandler::new().follow(flow, &teams, &name).await
            }
            Commands::Unfollow { id } => {
                let (teams, _) = self.create_services()?;
                let flow = FavoritesFlow::new(teams.clone());
                TeamHandler::new().unfollow(&flow, &teams, &id).await
            }
            Commands::Favorites => {
                let (teams, _) = self.create_services()?;
                let flow = FavoritesFlow::new(teams);
                FavoritesHandler::new().handle(&flow).await
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(config: Config, overrides: Overrides) -> Dispatcher {
        Dispatcher::new(config, None, false, overrides)
    }

    #[test]
    fn test_cli_override_beats_config() {
        let mut config = Config::default();
        config.set_base_url("http://file.test".to_string());
        config.set_api_key("filekey".to_string());

        let d = dispatcher(
            config,
            Overrides {
                url: Some("http://cli.test".to_string()),
                api_key: Some("  ".to_string()),
                no_persist: true,
            },
        );
        assert_eq!(d.effective_url(), "http://cli.test");
        assert_ne!(d.effective_api_key(), "  ");
    }

    #[tokio::test]
    async fn test_no_persist_uses_memory_store() {
        let d = dispatcher(
            Config::default(),
            Overrides {
                no_persist: true,
                ..Overrides::default()
            },
        );
        let store = d.create_favorites_store().expect("store");
        assert!(!store.is_followed_once("133604").await.expect("lookup"));
    }
}
