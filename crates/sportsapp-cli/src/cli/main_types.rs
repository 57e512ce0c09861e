use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sportsapp")]
#[command(about = "Browse sports leagues, search teams and keep a list of favorites")]
#[command(version)]
#[command(after_help = "Examples:
  sportsapp sports                            # List supported sports
  sportsapp leagues Soccer                    # Leagues for a sport
  sportsapp teams Soccer \"English Premier League\" --more 1
  sportsapp search Arsenal                    # Search teams by name
  sportsapp team Arsenal                      # Show team details
  sportsapp follow Arsenal                    # Add to favorites
  sportsapp favorites                         # List followed teams
  sportsapp config show                       # Show effective settings

Environment Variables:
  SPORTSAPP_URL       TheSportsDB server URL
  SPORTSAPP_API_KEY   API key (defaults to the free tier key)
  SPORTSAPP_DB        Favorites database file")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Server URL, overriding the config file
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API key, overriding the config file
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Keep favorites in memory for this run only
    #[arg(long, global = true)]
    pub no_persist: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the supported sports
    Sports,
    /// List leagues for a sport
    Leagues {
        /// Sport name, e.g. Soccer
        sport: String,
    },
    /// List teams playing in a league
    #[command(after_help = "Examples:
  sportsapp teams Soccer \"English Premier League\"
  sportsapp teams Basketball NBA --more 2     # Reveal two more pages")]
    Teams {
        sport: String,
        league: String,
        /// Number of extra pages to reveal
        #[arg(long, default_value = "0")]
        more: usize,
    },
    /// Search teams by name
    Search {
        /// Team name, at least a few characters
        query: String,
    },
    /// Show one team, preferring the cached favorite while offline
    Team {
        /// Exact team name
        name: String,
    },
    /// Follow a team by name
    Follow { name: String },
    /// Unfollow a team by id
    Unfollow { id: String },
    /// List followed teams
    Favorites,
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings and where each comes from
    Show,
    /// Persist settings to the config file
    #[command(after_help = "Examples:
  sportsapp config set --api-key 123
  sportsapp config set --url https://www.thesportsdb.com
  sportsapp config set --db ~/favorites.sqlite")]
    Set {
        /// TheSportsDB server URL
        #[arg(long)]
        url: Option<String>,
        /// API key
        #[arg(long)]
        api_key: Option<String>,
        /// Favorites database file
        #[arg(long)]
        db: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_teams_with_more() {
        let cli = Cli::parse_from([
            "sportsapp",
            "teams",
            "Soccer",
            "English Premier League",
            "--more",
            "2",
        ]);
        match cli.command {
            Commands::Teams {
                sport,
                league,
                more,
            } => {
                assert_eq!(sport, "Soccer");
                assert_eq!(league, "English Premier League");
                assert_eq!(more, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sportsapp", "favorites", "--no-persist", "-v"]);
        assert!(cli.no_persist);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Favorites));
    }
}
