//! SQLite-backed read-only access to the media library.

use std::path::Path;
use std::sync::Mutex;

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::{
    Episode, EpisodeStatus, Library, LibraryError, RecentEpisode, Show, ShowKind,
};

/// Tables read by [`SqliteLibrary`]. The library owner creates these; the
/// schema is exported so tests and tooling can build compatible databases.
pub const LIBRARY_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS tv_shows (
        indexer_id INTEGER PRIMARY KEY,
        show_name TEXT NOT NULL,
        air_by_date INTEGER NOT NULL DEFAULT 0,
        sports INTEGER NOT NULL DEFAULT 0,
        anime INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS tv_episodes (
        showid INTEGER NOT NULL,
        season INTEGER NOT NULL,
        episode INTEGER NOT NULL,
        scene_season INTEGER,
        scene_episode INTEGER,
        absolute_number INTEGER,
        scene_absolute_number INTEGER,
        airdate INTEGER NOT NULL DEFAULT 1,
        status INTEGER NOT NULL DEFAULT -1
    );

    CREATE TABLE IF NOT EXISTS scene_exceptions (
        indexer_id INTEGER NOT NULL,
        show_name TEXT NOT NULL
    );
"#;

/// SQLite-backed media library.
pub struct SqliteLibrary {
    conn: Mutex<Connection>,
}

impl SqliteLibrary {
    /// Open an existing library database read-only.
    pub fn open(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already opened connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Create an in-memory library with an empty schema (useful for testing).
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| LibraryError::Database(e.to_string()))?;
        conn.execute_batch(LIBRARY_SCHEMA)
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Run a statement against the underlying connection.
    ///
    /// The provider never writes; this exists to seed test databases.
    pub fn execute(&self, sql: &str) -> Result<(), LibraryError> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| LibraryError::Database(e.to_string()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, LibraryError> {
        self.conn
            .lock()
            .map_err(|_| LibraryError::Database("library connection poisoned".to_string()))
    }

    fn row_to_episode(row: &rusqlite::Row) -> rusqlite::Result<Episode> {
        let show_id: i64 = row.get(0)?;
        let season: u32 = row.get(1)?;
        let episode: u32 = row.get(2)?;
        let scene_season: Option<u32> = row.get(3)?;
        let scene_episode: Option<u32> = row.get(4)?;
        let absolute_number: Option<u32> = row.get(5)?;
        let scene_absolute_number: Option<u32> = row.get(6)?;
        let airdate: i64 = row.get(7)?;

        Ok(Episode {
            show_id,
            season,
            episode,
            // Scene numbering falls back to the indexer's when unmapped
            scene_season: scene_season.filter(|s| *s > 0).unwrap_or(season),
            scene_episode: scene_episode.filter(|e| *e > 0).unwrap_or(episode),
            absolute_number: absolute_number.filter(|n| *n > 0),
            scene_absolute_number: scene_absolute_number
                .filter(|n| *n > 0)
                .or(absolute_number.filter(|n| *n > 0)),
            airdate: ordinal_to_date(airdate),
        })
    }
}

/// Airdates are stored as proleptic Gregorian ordinals (0001-01-01 is 1).
/// Ordinals of 1 or below mean "never aired".
fn ordinal_to_date(ordinal: i64) -> Option<NaiveDate> {
    if ordinal <= 1 {
        return None;
    }
    i32::try_from(ordinal)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

fn date_to_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

impl Library for SqliteLibrary {
    fn recent_episodes(&self, since: NaiveDate) -> Result<Vec<RecentEpisode>, LibraryError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT s.show_name, e.showid, e.season, e.episode, e.status, e.airdate \
                 FROM tv_episodes AS e \
                 INNER JOIN tv_shows AS s ON (e.showid = s.indexer_id) \
                 WHERE e.airdate >= ?1 AND (e.status % 100) IN (?2, ?3) \
                 ORDER BY e.airdate, e.showid, e.season, e.episode",
            )
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(
                params![
                    date_to_ordinal(since),
                    EpisodeStatus::Downloaded.code(),
                    EpisodeStatus::Snatched.code()
                ],
                |row| {
                    let status: i64 = row.get(4)?;
                    let airdate: i64 = row.get(5)?;
                    Ok(RecentEpisode {
                        show_name: row.get(0)?,
                        show_id: row.get(1)?,
                        season: row.get(2)?,
                        episode: row.get(3)?,
                        status: EpisodeStatus::from_composite(status),
                        airdate: ordinal_to_date(airdate),
                    })
                },
            )
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| LibraryError::Database(e.to_string()))
    }

    fn find_show(&self, show_id: i64) -> Result<Option<Show>, LibraryError> {
        let conn = self.lock()?;

        let show = conn
            .query_row(
                "SELECT indexer_id, show_name, air_by_date, sports, anime \
                 FROM tv_shows WHERE indexer_id = ?1",
                params![show_id],
                |row| {
                    let air_by_date: bool = row.get(2)?;
                    let sports: bool = row.get(3)?;
                    let anime: bool = row.get(4)?;
                    let kind = if sports {
                        ShowKind::Sports
                    } else if air_by_date {
                        ShowKind::AirByDate
                    } else if anime {
                        ShowKind::Anime
                    } else {
                        ShowKind::Standard
                    };
                    Ok(Show {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        kind,
                        aliases: Vec::new(),
                    })
                },
            )
            .optional()
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let Some(mut show) = show else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare("SELECT show_name FROM scene_exceptions WHERE indexer_id = ?1 ORDER BY rowid")
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        show.aliases = stmt
            .query_map(params![show_id], |row| row.get::<_, String>(0))
            .map_err(|e| LibraryError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        Ok(Some(show))
    }

    fn find_episode(
        &self,
        show: &Show,
        season: u32,
        episode: u32,
    ) -> Result<Option<Episode>, LibraryError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT showid, season, episode, scene_season, scene_episode, \
             absolute_number, scene_absolute_number, airdate \
             FROM tv_episodes WHERE showid = ?1 AND season = ?2 AND episode = ?3",
            params![show.id, season, episode],
            Self::row_to_episode,
        )
        .optional()
        .map_err(|e| LibraryError::Database(e.to_string()))
    }
}
