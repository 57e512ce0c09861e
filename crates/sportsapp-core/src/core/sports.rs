//! Sports offered by the app and their fixed league lists.
//!
//! Sports listed here never hit the network for their leagues. Any other
//! sport name falls back to the remote league catalogue.

const STATIC_LEAGUES: &[(&str, &[&str])] = &[
    (
        "Soccer",
        &[
            "English Premier League",
            "Spanish La Liga",
            "German Bundesliga",
            "Italian Serie A",
            "French Ligue 1",
        ],
    ),
    ("Basketball", &["NBA", "FIBA Basketball World Cup"]),
    ("Baseball", &["MLB", "World Baseball Classic"]),
    (
        "Cricket",
        &[
            "Indian Premier League",
            "Big Bash League",
            "ICC Cricket World Cup",
        ],
    ),
];

/// Sport names in display order
pub fn sports() -> Vec<&'static str> {
    STATIC_LEAGUES.iter().map(|(sport, _)| *sport).collect()
}

/// Fixed league names for `sport`, matched case-insensitively
pub fn static_leagues(sport: &str) -> Option<&'static [&'static str]> {
    let sport = sport.trim();
    STATIC_LEAGUES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(sport))
        .map(|(_, leagues)| *leagues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sports_order() {
        assert_eq!(sports(), vec!["Soccer", "Basketball", "Baseball", "Cricket"]);
    }

    #[test]
    fn test_static_leagues_lookup() {
        let soccer = static_leagues(" soccer ").expect("soccer is static");
        assert_eq!(soccer.len(), 5);
        assert_eq!(soccer[0], "English Premier League");
        assert_eq!(static_leagues("Basketball"), Some(&["NBA", "FIBA Basketball World Cup"][..]));
        assert!(static_leagues("Curling").is_none());
    }
}
