use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS twitter_profiles (
            id              INTEGER PRIMARY KEY,
            url             TEXT UNIQUE NOT NULL,
            bio             TEXT NOT NULL DEFAULT '',
            follower_count  TEXT NOT NULL DEFAULT '',
            following_count TEXT NOT NULL DEFAULT '',
            location        TEXT NOT NULL DEFAULT '',
            website         TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Profiles ──

/// One scraped profile, keyed by its normalized URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    pub url: String,
    pub bio: String,
    pub follower_count: String,
    pub following_count: String,
    pub location: String,
    pub website: String,
}

/// Insert the row, or overwrite every non-key column when the URL already
/// exists. One statement, so the caller never sees a half-applied update.
pub fn upsert_profile(conn: &Connection, row: &ProfileRow) -> Result<()> {
    conn.execute(
        "INSERT INTO twitter_profiles
             (url, bio, follower_count, following_count, location, website)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(url) DO UPDATE SET
             bio = excluded.bio,
             follower_count = excluded.follower_count,
             following_count = excluded.following_count,
             location = excluded.location,
             website = excluded.website,
             updated_at = datetime('now')",
        rusqlite::params![
            row.url,
            row.bio,
            row.follower_count,
            row.following_count,
            row.location,
            row.website,
        ],
    )?;
    Ok(())
}

pub fn fetch_profiles(conn: &Connection, limit: usize) -> Result<Vec<ProfileRow>> {
    let sql = format!(
        "SELECT url, bio, follower_count, following_count, location, website
         FROM twitter_profiles
         ORDER BY id
         LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ProfileRow {
                url: row.get(0)?,
                bio: row.get(1)?,
                follower_count: row.get(2)?,
                following_count: row.get(3)?,
                location: row.get(4)?,
                website: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub with_bio: usize,
    pub with_location: usize,
    pub with_website: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize =
        conn.query_row("SELECT COUNT(*) FROM twitter_profiles", [], |r| r.get(0))?;
    let with_bio: usize = conn.query_row(
        "SELECT COUNT(*) FROM twitter_profiles WHERE bio != ''",
        [],
        |r| r.get(0),
    )?;
    let with_location: usize = conn.query_row(
        "SELECT COUNT(*) FROM twitter_profiles WHERE location != ''",
        [],
        |r| r.get(0),
    )?;
    let with_website: usize = conn.query_row(
        "SELECT COUNT(*) FROM twitter_profiles WHERE website != ''",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        total,
        with_bio,
        with_location,
        with_website,
    })
}
