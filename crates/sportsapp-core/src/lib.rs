//! # sportsapp-core
//!
//! Core library for browsing sports leagues, searching teams and keeping a
//! local list of followed teams backed by TheSportsDB.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sportsapp_core::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> sportsapp_core::Result<()> {
//!     let config = Config::load(None)?;
//!     let client = Arc::new(SportsDbClient::new(config.get_base_url(), config.get_api_key())?);
//!     let favorites = Arc::new(InMemoryFavoritesStore::new());
//!
//!     let teams = TeamService::new(client.clone(), favorites);
//!     let arsenal = teams.search("Arsenal").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  TheSportsDB client, wire models
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Services, flows, paging, failure classification
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Configuration, favorites database
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, text, logging
//! └─────────────────────────────────────┘
//! ```
//!
//! Flows publish their state through `tokio::sync::watch` channels. A newer
//! request always supersedes an older one: results from cancelled work are
//! never published.

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use sportsapp_core::prelude::*;
/// ```
pub mod prelude {
    // Error handling
    pub use crate::Result;
    pub use crate::error::AppError;

    // API client and models
    pub use crate::api::client::SportsDbClient;
    pub use crate::core::models::{FavoriteTeamRecord, League, Team};

    // Services and flows
    pub use crate::core::failure::{ClassifiedFailure, FailureCategory, UiMessage};
    pub use crate::core::flows::{
        FavoritesFlow, FavoritesView, FlowSettings, LeaguesFlow, LeaguesState, SearchFlow,
        SearchState, SearchStatus, TeamDetailFlow, TeamDetailState,
    };
    pub use crate::core::load_state::LoadState;
    pub use crate::core::paging::Page;
    pub use crate::core::services::config_service::ConfigService;
    pub use crate::core::services::league_service::LeagueService;
    pub use crate::core::services::team_service::TeamService;

    // Storage
    pub use crate::storage::config::Config;
    pub use crate::storage::favorites::{InMemoryFavoritesStore, SqliteFavoritesStore};

    // Display utilities
    pub use crate::display::TableDisplay;
}

/// Business logic layer: services, flows and domain models.
pub mod core;

/// Storage layer: TOML configuration and the favorites database.
pub mod storage;

/// Utilities layer: validation, text helpers and logging setup.
pub mod utils;

/// API layer: TheSportsDB HTTP client and wire models.
pub mod api;

/// Display layer: terminal tables and state messages.
pub mod display;

/// Hierarchical error system with severity levels and troubleshooting hints.
pub mod error;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
