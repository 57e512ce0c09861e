//! Domain models shared by the services and state holders.
//!
//! Remote DTOs are mapped into these types at the API boundary; the
//! favorites table stores a [`FavoriteTeamRecord`] per followed team.

use crate::api::models::{LeagueDto, TeamDto};

/// A team as shown to the user. Only `id` and `name` are guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub sport: Option<String>,
    pub league: Option<String>,
    pub country: Option<String>,
    pub stadium: Option<String>,
    pub stadium_location: Option<String>,
    pub stadium_capacity: Option<String>,
    pub badge_url: Option<String>,
    pub jersey_url: Option<String>,
    pub description: Option<String>,
    pub formed_year: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Map a remote payload, dropping entries without a usable id or name
    pub fn from_dto(dto: TeamDto) -> Option<Self> {
        let id = dto.id.filter(|s| !s.trim().is_empty())?;
        let name = dto.name.filter(|s| !s.trim().is_empty())?;

        Some(Self {
            id,
            name,
            short_name: dto.short_name,
            sport: dto.sport,
            league: dto.league,
            country: dto.country,
            stadium: dto.stadium,
            stadium_location: dto.stadium_location,
            stadium_capacity: dto.stadium_capacity,
            badge_url: dto.badge,
            jersey_url: dto.jersey,
            description: dto.description,
            formed_year: dto.formed_year,
            website: dto.website,
            facebook: dto.facebook,
            twitter: dto.twitter,
            instagram: dto.instagram,
            youtube: dto.youtube,
        })
    }

    pub fn from_dtos(dtos: Vec<TeamDto>) -> Vec<Self> {
        dtos.into_iter().filter_map(Self::from_dto).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    pub id: String,
    pub name: String,
    pub sport: Option<String>,
    pub alternate_name: Option<String>,
}

impl League {
    pub fn from_dto(dto: LeagueDto) -> Option<Self> {
        let id = dto.id.map(|s| s.trim().to_string()).unwrap_or_default();
        let name = dto.name.map(|s| s.trim().to_string()).unwrap_or_default();
        if id.is_empty() || name.is_empty() {
            return None;
        }

        Some(Self {
            id,
            name,
            sport: dto.sport.map(|s| s.trim().to_string()),
            alternate_name: dto.alternate_name.map(|s| s.trim().to_string()),
        })
    }

    pub fn from_dtos(dtos: Vec<LeagueDto>) -> Vec<Self> {
        dtos.into_iter().filter_map(Self::from_dto).collect()
    }
}

/// Persisted projection of a followed [`Team`], one row per team id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteTeamRecord {
    pub team: Team,
    /// Milliseconds since the Unix epoch at the last upsert
    pub cached_at: i64,
}

impl FavoriteTeamRecord {
    pub fn new(team: Team, cached_at: i64) -> Self {
        Self { team, cached_at }
    }

    /// Stamp the team with the current wall-clock time
    pub fn now(team: Team) -> Self {
        Self::new(team, chrono::Utc::now().timestamp_millis())
    }

    pub fn id(&self) -> &str {
        &self.team.id
    }

    pub fn into_team(self) -> Team {
        self.team
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(id: Option<&str>, name: Option<&str>) -> TeamDto {
        TeamDto {
            id: id.map(String::from),
            name: name.map(String::from),
            sport: Some("Soccer".to_string()),
            badge: Some("https://example.test/b.png".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_team_from_dto_maps_fields() {
        let team = Team::from_dto(dto(Some("1"), Some("Arsenal"))).expect("valid dto");
        assert_eq!(team.id, "1");
        assert_eq!(team.name, "Arsenal");
        assert_eq!(team.sport.as_deref(), Some("Soccer"));
        assert_eq!(team.badge_url.as_deref(), Some("https://example.test/b.png"));
    }

    #[test]
    fn test_team_from_dtos_drops_blank_identity() {
        let teams = Team::from_dtos(vec![
            dto(Some("1"), Some("Arsenal")),
            dto(None, Some("No Id")),
            dto(Some("3"), Some("  ")),
            dto(Some("4"), Some("Chelsea")),
        ]);
        let names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Arsenal", "Chelsea"]);
    }

    #[test]
    fn test_league_from_dto_trims() {
        let league = League::from_dto(LeagueDto {
            id: Some(" 4328 ".to_string()),
            name: Some(" English Premier League ".to_string()),
            sport: Some("Soccer ".to_string()),
            alternate_name: None,
        })
        .expect("valid league");
        assert_eq!(league.id, "4328");
        assert_eq!(league.name, "English Premier League");
        assert_eq!(league.sport.as_deref(), Some("Soccer"));

        assert!(League::from_dto(LeagueDto::default()).is_none());
    }

    #[test]
    fn test_favorite_record_round_trip() {
        let team = Team::new("1", "Arsenal");
        let record = FavoriteTeamRecord::new(team.clone(), 42);
        assert_eq!(record.id(), "1");
        assert_eq!(record.cached_at, 42);
        assert_eq!(record.into_team(), team);
    }
}
