pub mod config_service;
pub mod league_service;
pub mod team_service;
pub mod traits;
