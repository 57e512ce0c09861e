use crate::Result;
use crate::core::models::League;
use crate::core::services::traits::LeaguesRemote;
use crate::core::sports;
use std::sync::Arc;

/// League lookups, static table first, remote catalogue otherwise
#[derive(Clone)]
pub struct LeagueService {
    remote: Arc<dyn LeaguesRemote>,
}

impl LeagueService {
    pub fn new(remote: Arc<dyn LeaguesRemote>) -> Self {
        Self { remote }
    }

    /// League names to offer for `sport`
    pub async fn leagues_for_sport(&self, sport: &str) -> Result<Vec<String>> {
        if let Some(leagues) = sports::static_leagues(sport) {
            log::debug!("static leagues for {}", sport);
            return Ok(leagues.iter().map(|s| s.to_string()).collect());
        }

        let sport = sport.trim();
        log::debug!("fetching remote leagues for {}", sport);
        let leagues = self.remote.fetch_all_leagues().await?;
        Ok(leagues
            .into_iter()
            .filter(|l| {
                l.sport
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(sport))
            })
            .map(|l| l.name)
            .collect())
    }

    pub async fn all_leagues(&self) -> Result<Vec<League>> {
        self.remote.fetch_all_leagues().await
    }
}
