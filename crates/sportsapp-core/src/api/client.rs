use crate::api::models::{LeaguesResponse, TeamsResponse};
use crate::core::models::{League, Team};
use crate::core::services::traits::{LeaguesRemote, TeamsRemote};
use crate::error::{ApiError, AppError};
use crate::utils::error_helpers::*;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.thesportsdb.com";
/// Public test key accepted by TheSportsDB free tier
pub const DEFAULT_API_KEY: &str = "3";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("sportsapp/", env!("CARGO_PKG_VERSION"));

const TEAMS_BY_LEAGUE: &str = "search_all_teams.php";
const TEAMS_BY_NAME: &str = "searchteams.php";
const ALL_LEAGUES: &str = "all_leagues.php";

#[derive(Debug, Clone)]
pub struct SportsDbClient {
    client: Client,
    pub base_url: String,
    pub api_key: String,
    timeout_secs: u64,
}

impl SportsDbClient {
    // Create client with default settings
    pub fn new(base_url: String, api_key: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: String,
        api_key: String,
        timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init", timeout_secs))?;

        Ok(SportsDbClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs,
        })
    }

    /// Every endpoint lives under `/api/v1/json/{api_key}/`
    pub fn build_request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!(
            "{}/api/v1/json/{}/{}",
            self.base_url,
            self.api_key,
            endpoint.trim_start_matches('/')
        );
        self.client.request(method, url)
    }

    async fn get_json<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        log::debug!("GET {} {:?}", endpoint, query);

        let response = self
            .build_request(Method::GET, endpoint)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Api(convert_request_error(e, endpoint, self.timeout_secs)))?;

        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| AppError::Api(convert_json_error(e, endpoint)))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            log::warn!("{} answered {}", endpoint, status);
            Err(AppError::Api(convert_status_error(
                status.as_u16(),
                endpoint,
                error_text,
                self.timeout_secs,
            )))
        }
    }

    async fn search_teams(&self, name: &str) -> Result<Vec<Team>, AppError> {
        let response: TeamsResponse = self.get_json(TEAMS_BY_NAME, &[("t", name)]).await?;
        Ok(Team::from_dtos(response.teams.unwrap_or_default()))
    }
}

#[async_trait]
impl TeamsRemote for SportsDbClient {
    async fn fetch_teams_by_league(&self, league_name: &str) -> crate::Result<Vec<Team>> {
        let response: TeamsResponse = self
            .get_json(TEAMS_BY_LEAGUE, &[("l", league_name)])
            .await?;
        Ok(Team::from_dtos(response.teams.unwrap_or_default()))
    }

    async fn fetch_teams_by_name(&self, query: &str) -> crate::Result<Vec<Team>> {
        self.search_teams(query).await
    }

    async fn fetch_team_by_exact_name(&self, name: &str) -> crate::Result<Option<Team>> {
        Ok(self.search_teams(name).await?.into_iter().next())
    }
}

#[async_trait]
impl LeaguesRemote for SportsDbClient {
    async fn fetch_all_leagues(&self) -> crate::Result<Vec<League>> {
        let response: LeaguesResponse = self.get_json(ALL_LEAGUES, &[]).await?;
        Ok(League::from_dtos(response.leagues.unwrap_or_default()))
    }
}
