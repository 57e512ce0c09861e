use crate::Result;
use crate::core::live::{self, LiveStream};
use crate::core::models::{FavoriteTeamRecord, League, Team};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::watch;

/// Remote source of team data
#[async_trait]
pub trait TeamsRemote: Send + Sync {
    /// All teams playing in the named league
    async fn fetch_teams_by_league(&self, league_name: &str) -> Result<Vec<Team>>;

    /// Teams whose name matches the query
    async fn fetch_teams_by_name(&self, query: &str) -> Result<Vec<Team>>;

    /// The single team best matching `name`, if any
    async fn fetch_team_by_exact_name(&self, name: &str) -> Result<Option<Team>>;
}

/// Remote source of league data
#[async_trait]
pub trait LeaguesRemote: Send + Sync {
    async fn fetch_all_leagues(&self) -> Result<Vec<League>>;
}

/// Local table of followed teams, one row per team id.
///
/// Writers are serialized by the implementation. Every mutation is published
/// to all receivers handed out by [`FavoritesStore::observe_all`].
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Insert or overwrite the record for `record.team.id`
    async fn upsert(&self, record: FavoriteTeamRecord) -> Result<()>;

    async fn delete_by_id(&self, id: &str) -> Result<()>;

    async fn get_by_name(&self, name: &str) -> Result<Option<FavoriteTeamRecord>>;

    async fn is_followed_once(&self, id: &str) -> Result<bool>;

    /// Live list of all records ordered by team name
    fn observe_all(&self) -> watch::Receiver<Vec<FavoriteTeamRecord>>;

    fn observe_ids(&self) -> LiveStream<BTreeSet<String>> {
        live::project(self.observe_all(), |records: &Vec<FavoriteTeamRecord>| {
            records.iter().map(|r| r.team.id.clone()).collect()
        })
    }

    fn observe_is_followed(&self, id: &str) -> LiveStream<bool> {
        let id = id.to_string();
        live::project(self.observe_all(), move |records: &Vec<FavoriteTeamRecord>| {
            records.iter().any(|r| r.team.id == id)
        })
    }
}
