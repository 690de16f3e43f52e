use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::store::{like_pattern, search_term, Store};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricMatch {
    pub song_title: String,
    pub song_link: String,
    /// The full stored lyric text.
    pub lyrics: String,
}

pub fn search_lyrics(store: &Store, term: &str) -> Result<Vec<LyricMatch>> {
    let Some(term) = search_term(term) else {
        return Ok(Vec::new());
    };
    let pattern = like_pattern(term);
    let matches = store.query_map(
        "
        SELECT m.song_title, m.song_url, l.song_lyrics
        FROM Musicas m
        JOIN Letras l ON m.song_id = l.lyrics_id
        WHERE l.song_lyrics LIKE ?1 ESCAPE '\\'
        ORDER BY m.song_title, m.song_id
        ",
        [&pattern],
        |row| {
            Ok(LyricMatch {
                song_title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                song_link: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                lyrics: row.get(2)?,
            })
        },
    )?;
    debug!("Lyrics search matched {} songs", matches.len());
    Ok(matches)
}
