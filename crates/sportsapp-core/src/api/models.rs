use serde::{Deserialize, Serialize};

// Envelope models. TheSportsDB answers `{"teams": null}` when nothing matches.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TeamsResponse {
    #[serde(default)]
    pub teams: Option<Vec<TeamDto>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LeaguesResponse {
    #[serde(default)]
    pub leagues: Option<Vec<LeagueDto>>,
}

// Team models
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct TeamDto {
    #[serde(rename = "idTeam", default)]
    pub id: Option<String>,
    #[serde(rename = "strTeam", default)]
    pub name: Option<String>,
    #[serde(rename = "strTeamShort", default)]
    pub short_name: Option<String>,
    #[serde(rename = "strSport", default)]
    pub sport: Option<String>,
    #[serde(rename = "strLeague", default)]
    pub league: Option<String>,
    #[serde(rename = "strCountry", default)]
    pub country: Option<String>,
    #[serde(rename = "strStadium", default)]
    pub stadium: Option<String>,
    #[serde(rename = "strStadiumLocation", default)]
    pub stadium_location: Option<String>,
    #[serde(rename = "intStadiumCapacity", default)]
    pub stadium_capacity: Option<String>,
    #[serde(rename = "strBadge", default)]
    pub badge: Option<String>,
    #[serde(rename = "strTeamJersey", default)]
    pub jersey: Option<String>,
    #[serde(rename = "strDescriptionEN", default)]
    pub description: Option<String>,
    #[serde(rename = "intFormedYear", default)]
    pub formed_year: Option<String>,
    #[serde(rename = "strWebsite", default)]
    pub website: Option<String>,
    #[serde(rename = "strFacebook", default)]
    pub facebook: Option<String>,
    #[serde(rename = "strTwitter", default)]
    pub twitter: Option<String>,
    #[serde(rename = "strInstagram", default)]
    pub instagram: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,
}

// League models
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct LeagueDto {
    #[serde(rename = "idLeague", default)]
    pub id: Option<String>,
    #[serde(rename = "strLeague", default)]
    pub name: Option<String>,
    #[serde(rename = "strSport", default)]
    pub sport: Option<String>,
    #[serde(rename = "strLeagueAlternate", default)]
    pub alternate_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teams_response_null_list() {
        let response: TeamsResponse =
            serde_json::from_str(r#"{"teams": null}"#).expect("null teams should parse");
        assert!(response.teams.is_none());
    }

    #[test]
    fn test_team_dto_field_names() {
        let json = r#"{
            "idTeam": "133604",
            "strTeam": "Arsenal",
            "strTeamShort": "ARS",
            "strSport": "Soccer",
            "strLeague": "English Premier League",
            "intFormedYear": "1892",
            "strBadge": "https://example.test/badge.png",
            "strUnknownField": "ignored"
        }"#;
        let dto: TeamDto = serde_json::from_str(json).expect("team should parse");
        assert_eq!(dto.id.as_deref(), Some("133604"));
        assert_eq!(dto.name.as_deref(), Some("Arsenal"));
        assert_eq!(dto.short_name.as_deref(), Some("ARS"));
        assert_eq!(dto.formed_year.as_deref(), Some("1892"));
        assert!(dto.stadium.is_none());
    }

    #[test]
    fn test_league_dto_field_names() {
        let json = r#"{"leagues": [{
            "idLeague": "4328",
            "strLeague": "English Premier League",
            "strSport": "Soccer",
            "strLeagueAlternate": "Premier League, EPL"
        }]}"#;
        let response: LeaguesResponse = serde_json::from_str(json).expect("leagues should parse");
        let leagues = response.leagues.unwrap_or_default();
        assert_eq!(leagues.len(), 1);
        assert_eq!(leagues[0].alternate_name.as_deref(), Some("Premier League, EPL"));
    }
}
