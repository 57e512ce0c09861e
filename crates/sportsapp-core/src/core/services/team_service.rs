//! Team lookups merged with the local favorites table.

use crate::Result;
use crate::core::live::{self, LiveStream};
use crate::core::models::{FavoriteTeamRecord, Team};
use crate::core::services::traits::{FavoritesStore, TeamsRemote};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Clone, Copy)]
enum LookupStep {
    Cache,
    Network { had_cache: bool },
    Done,
}

struct Lookup {
    remote: Arc<dyn TeamsRemote>,
    favorites: Arc<dyn FavoritesStore>,
    name: String,
    step: LookupStep,
}

/// Service for team search, detail lookup and follow state
#[derive(Clone)]
pub struct TeamService {
    remote: Arc<dyn TeamsRemote>,
    favorites: Arc<dyn FavoritesStore>,
}

impl TeamService {
    pub fn new(remote: Arc<dyn TeamsRemote>, favorites: Arc<dyn FavoritesStore>) -> Self {
        Self { remote, favorites }
    }

    pub async fn search_by_league(&self, league_name: &str) -> Result<Vec<Team>> {
        log::debug!("Fetching teams for league {}", league_name);
        self.remote.fetch_teams_by_league(league_name).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Team>> {
        log::debug!("Searching teams matching {:?}", query);
        self.remote.fetch_teams_by_name(query).await
    }

    /// Cache-then-network lookup of a single team.
    ///
    /// Emits the followed record named `name` first when one exists, then the
    /// network answer. A followed team found on the network has its record
    /// refreshed. A network failure is only emitted when nothing was cached.
    pub fn get_team_by_name(&self, name: &str) -> BoxStream<'static, Result<Option<Team>>> {
        let lookup = Lookup {
            remote: Arc::clone(&self.remote),
            favorites: Arc::clone(&self.favorites),
            name: name.to_string(),
            step: LookupStep::Cache,
        };

        stream::unfold(lookup, |mut lookup| async move {
            loop {
                match lookup.step {
                    LookupStep::Cache => {
                        let cached = match lookup.favorites.get_by_name(&lookup.name).await {
                            Ok(cached) => cached,
                            Err(e) => {
                                log::warn!("Favorites lookup for {} failed: {}", lookup.name, e);
                                None
                            }
                        };

                        match cached {
                            Some(record) => {
                                lookup.step = LookupStep::Network { had_cache: true };
                                return Some((Ok(Some(record.into_team())), lookup));
                            }
                            None => lookup.step = LookupStep::Network { had_cache: false },
                        }
                    }
                    LookupStep::Network { had_cache } => {
                        lookup.step = LookupStep::Done;
                        let item = match lookup.remote.fetch_team_by_exact_name(&lookup.name).await {
                            Ok(Some(team)) => {
                                refresh_if_followed(lookup.favorites.as_ref(), &team).await;
                                Ok(Some(team))
                            }
                            Ok(None) => Ok(None),
                            Err(e) if had_cache => {
                                log::info!("Keeping cached {} after network error: {}", lookup.name, e);
                                return None;
                            }
                            Err(e) => Err(e),
                        };
                        return Some((item, lookup));
                    }
                    LookupStep::Done => return None,
                }
            }
        })
        .boxed()
    }

    /// Live list of followed teams ordered by name
    pub fn observe_favorites(&self) -> LiveStream<Vec<Team>> {
        live::project(self.favorites.observe_all(), |records: &Vec<FavoriteTeamRecord>| {
            records.iter().map(|r| r.team.clone()).collect()
        })
    }

    pub fn observe_favorite_ids(&self) -> LiveStream<BTreeSet<String>> {
        self.favorites.observe_ids()
    }

    pub fn observe_is_followed(&self, id: &str) -> LiveStream<bool> {
        self.favorites.observe_is_followed(id)
    }

    pub async fn is_followed(&self, id: &str) -> Result<bool> {
        self.favorites.is_followed_once(id).await
    }

    /// Upsert the team, refreshing its cached-at stamp
    pub async fn follow(&self, team: Team) -> Result<()> {
        log::info!("Following {} ({})", team.name, team.id);
        self.favorites.upsert(FavoriteTeamRecord::now(team)).await
    }

    pub async fn unfollow(&self, id: &str) -> Result<()> {
        log::info!("Unfollowing {}", id);
        self.favorites.delete_by_id(id).await
    }
}

async fn refresh_if_followed(favorites: &dyn FavoritesStore, team: &Team) {
    match favorites.is_followed_once(&team.id).await {
        Ok(true) => {
            if let Err(e) = favorites.upsert(FavoriteTeamRecord::now(team.clone())).await {
                log::warn!("Failed to refresh favorite {}: {}", team.id, e);
            }
        }
        Ok(false) => {}
        Err(e) => log::warn!("Follow check for {} failed: {}", team.id, e),
    }
}
