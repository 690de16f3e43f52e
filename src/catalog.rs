//! The catalog module holds the fixed list of analytic questions answered by the Q&A batch.

use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryDefinition {
    /// 1-based position in the catalog.
    pub seq: usize,
    pub question: &'static str,
    #[serde(skip)]
    pub sql: &'static str,
}

const QUESTIONS: [(&str, &str); 10] = [
    (
        "Which song has the most views?",
        "
        SELECT song_title AS Title, views AS Views
        FROM Musicas
        WHERE views = (
            SELECT MAX(views)
            FROM Musicas
        )
        ORDER BY Title
        ",
    ),
    (
        "Which album has over 10 songs and more than 20 million combined views?",
        "
        SELECT a.album_title AS Title, SUM(m.views) AS Total_Views
        FROM Albuns a
        JOIN Musicas m ON a.album_id = m.album_id
        GROUP BY a.album_id, a.album_title
        HAVING COUNT(m.song_id) > 10
           AND SUM(m.views) > 20000000
        ORDER BY Title
        ",
    ),
    (
        "Which album has the highest average views per song?",
        "
        SELECT album_title AS Title, avg_views AS Average_Views
        FROM (
            SELECT a.album_title, AVG(m.views) AS avg_views
            FROM Albuns a
            JOIN Musicas m ON a.album_id = m.album_id
            GROUP BY a.album_id, a.album_title
        ) AS AlbumAverages
        WHERE avg_views = (
            SELECT MAX(avg_views)
            FROM (
                SELECT AVG(m.views) AS avg_views
                FROM Albuns a
                JOIN Musicas m ON a.album_id = m.album_id
                GROUP BY a.album_id
            ) AS Averages
        )
        ORDER BY Title
        ",
    ),
    (
        "Which songs have more than one writer?",
        "
        SELECT m.song_title AS Title, COUNT(DISTINCT e.writer_id) AS Writer_Count
        FROM Musicas m
        JOIN Escritores e ON m.song_id = e.song_id
        GROUP BY m.song_id, m.song_title
        HAVING COUNT(DISTINCT e.writer_id) > 1
        ORDER BY Title
        ",
    ),
    (
        "What are the most used tags?",
        "
        SELECT tag AS Tag, uses AS Count
        FROM (
            SELECT t.tag, COUNT(*) AS uses
            FROM Descricoes d
            JOIN Tags t ON d.tag_id = t.tag_id
            GROUP BY t.tag
        ) AS TagCounts
        WHERE uses = (
            SELECT MAX(uses)
            FROM (
                SELECT COUNT(*) AS uses
                FROM Descricoes d
                JOIN Tags t ON d.tag_id = t.tag_id
                GROUP BY t.tag
            ) AS MaxTagCounts
        )
        ORDER BY Tag
        ",
    ),
    (
        "Which artist is credited on the most songs?",
        "
        SELECT person AS Artist, songs AS Song_Count
        FROM (
            SELECT p.person, COUNT(DISTINCT ar.song_id) AS songs
            FROM Pessoas p
            JOIN Artistas ar ON ar.artist_id = p.person_id
            GROUP BY p.person_id, p.person
        ) AS ArtistSongs
        WHERE songs = (
            SELECT MAX(songs)
            FROM (
                SELECT COUNT(DISTINCT song_id) AS songs
                FROM Artistas
                GROUP BY artist_id
            ) AS MaxArtistSongs
        )
        ORDER BY Artist
        ",
    ),
    (
        "How many songs are in each album?",
        "
        SELECT a.album_title AS Title, COUNT(m.song_id) AS Count
        FROM Albuns a
        LEFT JOIN Musicas m ON a.album_id = m.album_id
        GROUP BY a.album_id, a.album_title
        ORDER BY Title
        ",
    ),
    (
        "Which albums have songs with over 1 million views?",
        "
        SELECT DISTINCT a.album_title AS Title
        FROM Albuns a
        JOIN Musicas m ON a.album_id = m.album_id
        WHERE m.views > 1000000
        ORDER BY Title
        ",
    ),
    (
        "What is the most popular album category (based on total views)?",
        "
        SELECT category AS Category, total_views AS Views
        FROM (
            SELECT a.category, SUM(m.views) AS total_views
            FROM Albuns a
            JOIN Musicas m ON a.album_id = m.album_id
            GROUP BY a.category
        ) AS CategoryViews
        WHERE total_views = (
            SELECT MAX(total_views)
            FROM (
                SELECT SUM(m.views) AS total_views
                FROM Albuns a
                JOIN Musicas m ON a.album_id = m.album_id
                GROUP BY a.category
            ) AS MaxCategoryViews
        )
        ORDER BY Category
        ",
    ),
    (
        "Which songs have more than one tag associated?",
        "
        SELECT m.song_title AS Title, COUNT(DISTINCT d.tag_id) AS Count
        FROM Musicas m
        JOIN Descricoes d ON m.song_id = d.song_id
        GROUP BY m.song_id, m.song_title
        HAVING COUNT(DISTINCT d.tag_id) > 1
        ORDER BY Title
        ",
    ),
];

pub static CATALOG: Lazy<Vec<QueryDefinition>> = Lazy::new(|| {
    QUESTIONS
        .iter()
        .enumerate()
        .map(|(idx, &(question, sql))| QueryDefinition {
            seq: idx + 1,
            question,
            sql,
        })
        .collect()
});

pub fn definitions() -> &'static [QueryDefinition] {
    &CATALOG
}
