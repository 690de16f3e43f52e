//! The library module provides the plain listings: album and song indexes, title search, and
//! overall statistics.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::store::{like_pattern, search_term, Store};

/// Release dates are stored as `DD/MM/YYYY` text.
const RELEASE_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleLink {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TitleSearch {
    pub albums: Vec<TitleLink>,
    pub songs: Vec<TitleLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedSong {
    pub title: String,
    pub link: String,
    /// The stored date text, unchanged.
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LibraryStats {
    pub albums: i64,
    pub songs: i64,
    pub producers: i64,
    pub artists: i64,
    pub writers: i64,
    pub tags: i64,
}

/// Parse a stored release date into a chronological key. Anything that is not a valid
/// `DD/MM/YYYY` date yields `None`.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), RELEASE_DATE_FORMAT).ok()
}

fn title_links(store: &Store, sql: &str, pattern: &str) -> rusqlite::Result<Vec<TitleLink>> {
    store.query_map(sql, [pattern], |row| {
        Ok(TitleLink {
            title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
            link: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        })
    })
}

pub fn search_albums_and_songs(store: &Store, term: &str) -> Result<TitleSearch> {
    let Some(term) = search_term(term) else {
        return Ok(TitleSearch::default());
    };
    let pattern = like_pattern(term);
    let albums = title_links(
        store,
        "SELECT album_title, album_url FROM Albuns WHERE album_title LIKE ?1 ESCAPE '\\' ORDER BY album_title",
        &pattern,
    )?;
    let songs = title_links(
        store,
        "SELECT song_title, song_url FROM Musicas WHERE song_title LIKE ?1 ESCAPE '\\' ORDER BY song_title",
        &pattern,
    )?;
    debug!("Title search matched {} albums and {} songs", albums.len(), songs.len());
    Ok(TitleSearch { albums, songs })
}

/// All albums by title, without the placeholder album named `no_album_title`.
pub fn list_albums(store: &Store, no_album_title: &str) -> Result<Vec<TitleLink>> {
    let albums = title_links(
        store,
        "
        SELECT album_title, album_url
        FROM Albuns
        WHERE album_title <> ?1
        ORDER BY album_title
        ",
        no_album_title,
    )?;
    Ok(albums)
}

/// All songs in release order. Songs whose date cannot be parsed come last, ordered by title.
pub fn list_songs(store: &Store) -> Result<Vec<DatedSong>> {
    let mut songs = store.query_map("SELECT song_title, song_url, date FROM Musicas", [], |row| {
        Ok(DatedSong {
            title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
            link: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            date: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        })
    })?;
    songs.sort_by_cached_key(|s| {
        let date = parse_release_date(&s.date);
        (date.is_none(), date, s.title.clone())
    });
    Ok(songs)
}

pub fn library_stats(store: &Store) -> Result<LibraryStats> {
    Ok(LibraryStats {
        albums: store.count("SELECT COUNT(*) FROM Albuns")?,
        songs: store.count("SELECT COUNT(*) FROM Musicas")?,
        producers: store.count("SELECT COUNT(DISTINCT producer_id) FROM Produtores")?,
        artists: store.count("SELECT COUNT(DISTINCT artist_id) FROM Artistas")?,
        writers: store.count("SELECT COUNT(DISTINCT writer_id) FROM Escritores")?,
        tags: store.count("SELECT COUNT(*) FROM Tags")?,
    })
}
