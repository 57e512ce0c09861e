//! Favorites table
//!
//! One row per followed team, keyed by team id. Two implementations share
//! the same semantics: SQLite on disk, and an in-memory map.

use crate::Result;
use crate::core::models::{FavoriteTeamRecord, Team};
use crate::core::services::traits::FavoritesStore;
use crate::error::StorageError;
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

const DB_FILE: &str = "favorites.sqlite";

const SELECT_COLUMNS: &str = "id, name, short_name, sport, league, country, stadium, \
     stadium_location, stadium_capacity, badge_url, jersey_url, description, formed_year, \
     website, facebook, twitter, instagram, youtube, cached_at";

/// Default on-disk location of the favorites database
pub fn default_db_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("sportsapp").join(DB_FILE))
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS favorite_teams (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            short_name TEXT,
            sport TEXT,
            league TEXT,
            country TEXT,
            stadium TEXT,
            stadium_location TEXT,
            stadium_capacity TEXT,
            badge_url TEXT,
            jersey_url TEXT,
            description TEXT,
            formed_year TEXT,
            website TEXT,
            facebook TEXT,
            twitter TEXT,
            instagram TEXT,
            youtube TEXT,
            cached_at INTEGER NOT NULL
        );
        "#,
    )
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<FavoriteTeamRecord> {
    let team = Team {
        id: row.get(0)?,
        name: row.get(1)?,
        short_name: row.get(2)?,
        sport: row.get(3)?,
        league: row.get(4)?,
        country: row.get(5)?,
        stadium: row.get(6)?,
        stadium_location: row.get(7)?,
        stadium_capacity: row.get(8)?,
        badge_url: row.get(9)?,
        jersey_url: row.get(10)?,
        description: row.get(11)?,
        formed_year: row.get(12)?,
        website: row.get(13)?,
        facebook: row.get(14)?,
        twitter: row.get(15)?,
        instagram: row.get(16)?,
        youtube: row.get(17)?,
    };
    Ok(FavoriteTeamRecord::new(team, row.get(18)?))
}

fn load_all(conn: &Connection) -> rusqlite::Result<Vec<FavoriteTeamRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM favorite_teams ORDER BY name ASC, id ASC",
        SELECT_COLUMNS
    ))?;
    let rows = stmt.query_map([], record_from_row)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn upsert_record(conn: &Connection, record: &FavoriteTeamRecord) -> rusqlite::Result<()> {
    let t = &record.team;
    conn.execute(
        r#"
        INSERT INTO favorite_teams (
            id, name, short_name, sport, league, country, stadium,
            stadium_location, stadium_capacity, badge_url, jersey_url, description,
            formed_year, website, facebook, twitter, instagram, youtube, cached_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7,
            ?8, ?9, ?10, ?11, ?12,
            ?13, ?14, ?15, ?16, ?17, ?18, ?19
        )
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            short_name = excluded.short_name,
            sport = excluded.sport,
            league = excluded.league,
            country = excluded.country,
            stadium = excluded.stadium,
            stadium_location = excluded.stadium_location,
            stadium_capacity = excluded.stadium_capacity,
            badge_url = excluded.badge_url,
            jersey_url = excluded.jersey_url,
            description = excluded.description,
            formed_year = excluded.formed_year,
            website = excluded.website,
            facebook = excluded.facebook,
            twitter = excluded.twitter,
            instagram = excluded.instagram,
            youtube = excluded.youtube,
            cached_at = excluded.cached_at
        "#,
        params![
            t.id,
            t.name,
            t.short_name,
            t.sport,
            t.league,
            t.country,
            t.stadium,
            t.stadium_location,
            t.stadium_capacity,
            t.badge_url,
            t.jersey_url,
            t.description,
            t.formed_year,
            t.website,
            t.facebook,
            t.twitter,
            t.instagram,
            t.youtube,
            record.cached_at,
        ],
    )?;
    Ok(())
}

struct SqliteInner {
    conn: Mutex<Connection>,
    changes: watch::Sender<Vec<FavoriteTeamRecord>>,
}

impl SqliteInner {
    fn lock(&self) -> std::result::Result<std::sync::MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Task {
            message: "favorites connection lock poisoned".to_string(),
        })
    }
}

/// SQLite-backed favorites table
#[derive(Clone)]
pub struct SqliteFavoritesStore {
    inner: Arc<SqliteInner>,
}

impl SqliteFavoritesStore {
    /// Open (creating if needed) the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }
        let conn = Connection::open(path).map_err(StorageError::Database)?;
        log::debug!("Opened favorites database at {}", path.display());
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::Database)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn).map_err(StorageError::Database)?;
        let initial = load_all(&conn).map_err(StorageError::Database)?;
        let (changes, _) = watch::channel(initial);

        Ok(Self {
            inner: Arc::new(SqliteInner {
                conn: Mutex::new(conn),
                changes,
            }),
        })
    }

    /// Run `f` on the blocking pool while holding the connection
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteInner, &Connection) -> std::result::Result<T, StorageError>
            + Send
            + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let result = tokio::task::spawn_blocking(move || {
            let conn = inner.lock()?;
            f(&inner, &conn)
        })
        .await
        .map_err(|e| StorageError::Task {
            message: e.to_string(),
        })?;
        Ok(result?)
    }

    /// Apply a write and publish the new table contents under the same lock
    async fn mutate<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<()> + Send + 'static,
    {
        self.with_conn(move |inner, conn| {
            write(conn)?;
            let all = load_all(conn)?;
            inner.changes.send_replace(all);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl FavoritesStore for SqliteFavoritesStore {
    async fn upsert(&self, record: FavoriteTeamRecord) -> Result<()> {
        log::debug!("Upserting favorite {} ({})", record.team.name, record.team.id);
        self.mutate(move |conn| upsert_record(conn, &record)).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        log::debug!("Deleting favorite {}", id);
        let id = id.to_string();
        self.mutate(move |conn| {
            conn.execute("DELETE FROM favorite_teams WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<FavoriteTeamRecord>> {
        let name = name.to_string();
        self.with_conn(move |_, conn| {
            let record = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM favorite_teams WHERE name = ?1 LIMIT 1",
                        SELECT_COLUMNS
                    ),
                    params![name],
                    record_from_row,
                )
                .optional()?;
            Ok(record)
        })
        .await
    }

    async fn is_followed_once(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_conn(move |_, conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM favorite_teams WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    fn observe_all(&self) -> watch::Receiver<Vec<FavoriteTeamRecord>> {
        self.inner.changes.subscribe()
    }
}

/// Favorites kept in memory only; same ordering and upsert rules as SQLite
pub struct InMemoryFavoritesStore {
    rows: Mutex<BTreeMap<String, FavoriteTeamRecord>>,
    changes: watch::Sender<Vec<FavoriteTeamRecord>>,
}

impl Default for InMemoryFavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFavoritesStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            rows: Mutex::new(BTreeMap::new()),
            changes,
        }
    }

    fn mutate(
        &self,
        write: impl FnOnce(&mut BTreeMap<String, FavoriteTeamRecord>),
    ) -> Result<()> {
        let mut rows = self.rows.lock().map_err(|_| StorageError::Task {
            message: "favorites lock poisoned".to_string(),
        })?;
        write(&mut rows);

        let mut all: Vec<FavoriteTeamRecord> = rows.values().cloned().collect();
        all.sort_by(|a, b| a.team.name.cmp(&b.team.name).then(a.team.id.cmp(&b.team.id)));
        self.changes.send_replace(all);
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&BTreeMap<String, FavoriteTeamRecord>) -> T) -> Result<T> {
        let rows = self.rows.lock().map_err(|_| StorageError::Task {
            message: "favorites lock poisoned".to_string(),
        })?;
        Ok(f(&rows))
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavoritesStore {
    async fn upsert(&self, record: FavoriteTeamRecord) -> Result<()> {
        self.mutate(|rows| {
            rows.insert(record.team.id.clone(), record);
        })
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.mutate(|rows| {
            rows.remove(id);
        })
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<FavoriteTeamRecord>> {
        self.read(|rows| rows.values().find(|r| r.team.name == name).cloned())
    }

    async fn is_followed_once(&self, id: &str) -> Result<bool> {
        self.read(|rows| rows.contains_key(id))
    }

    fn observe_all(&self) -> watch::Receiver<Vec<FavoriteTeamRecord>> {
        self.changes.subscribe()
    }
}
