//! The people module implements person search across the three credit roles.
//!
//! A search for one role proceeds in two statements against the store:
//!
//! 1. The distinct songs reached through a person whose name contains the term and who holds the
//!    requested role on that song.
//! 2. Every credit (in all three roles) on those songs, regardless of the term.
//!
//! The credits are then folded in memory into per-song, per-role sets keyed by person id, so the
//! same person listed twice is counted once while two people who share a name are both kept.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::RoleSearchError;
use crate::store::{describe_failure, like_pattern, search_term, RecordId, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Producer,
    Artist,
    Writer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Producer, Role::Artist, Role::Writer];

    /// Slot of this role in per-song credit arrays, in `ALL` order.
    fn index(self) -> usize {
        match self {
            Role::Producer => 0,
            Role::Artist => 1,
            Role::Writer => 2,
        }
    }

    /// The assignment table for this role.
    fn table(self) -> &'static str {
        match self {
            Role::Producer => "Produtores",
            Role::Artist => "Artistas",
            Role::Writer => "Escritores",
        }
    }

    /// The column in `table()` that references `Pessoas.person_id`.
    fn person_column(self) -> &'static str {
        match self {
            Role::Producer => "producer_id",
            Role::Artist => "artist_id",
            Role::Writer => "writer_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Artist => "artist",
            Role::Writer => "writer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credit {
    pub person_id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRoleResult {
    pub song_id: RecordId,
    pub song_title: String,
    pub song_link: String,
    pub producers: Vec<Credit>,
    pub artists: Vec<Credit>,
    pub writers: Vec<Credit>,
}

impl SongRoleResult {
    pub fn credits(&self, role: Role) -> &[Credit] {
        match role {
            Role::Producer => &self.producers,
            Role::Artist => &self.artists,
            Role::Writer => &self.writers,
        }
    }

    pub fn names(&self, role: Role) -> Vec<&str> {
        self.credits(role).iter().map(|c| c.name.as_str()).collect()
    }
}

/// Results of a full people search. Each role channel succeeds or fails on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeopleSearch {
    pub producer: Result<Vec<SongRoleResult>, RoleSearchError>,
    pub artista: Result<Vec<SongRoleResult>, RoleSearchError>,
    pub escritor: Result<Vec<SongRoleResult>, RoleSearchError>,
}

impl PeopleSearch {
    pub fn empty() -> Self {
        Self {
            producer: Ok(Vec::new()),
            artista: Ok(Vec::new()),
            escritor: Ok(Vec::new()),
        }
    }

    /// Run `lookup` once per role. An error in one channel is stored and the others still run.
    pub fn collect<F>(mut lookup: F) -> Self
    where
        F: FnMut(Role) -> Result<Vec<SongRoleResult>, RoleSearchError>,
    {
        Self {
            producer: lookup(Role::Producer),
            artista: lookup(Role::Artist),
            escritor: lookup(Role::Writer),
        }
    }

    pub fn get(&self, role: Role) -> &Result<Vec<SongRoleResult>, RoleSearchError> {
        match role {
            Role::Producer => &self.producer,
            Role::Artist => &self.artista,
            Role::Writer => &self.escritor,
        }
    }

    pub fn errors(&self) -> Vec<&RoleSearchError> {
        Role::ALL.iter().filter_map(|r| self.get(*r).as_ref().err()).collect()
    }
}

pub fn search_people(store: &Store, term: &str) -> PeopleSearch {
    if search_term(term).is_none() {
        return PeopleSearch::empty();
    }
    PeopleSearch::collect(|role| search_by_role(store, role, term))
}

struct MatchedSong {
    id: RecordId,
    title: String,
    link: String,
}

/// Find every song where a person whose name contains `term` holds `role`, with the complete
/// producer/artist/writer credits of each song. Ordered by song title.
pub fn search_by_role(store: &Store, role: Role, term: &str) -> Result<Vec<SongRoleResult>, RoleSearchError> {
    let Some(term) = search_term(term) else {
        return Ok(Vec::new());
    };
    let pattern = like_pattern(term);
    let fail = |e: rusqlite::Error| {
        let message = describe_failure(&e, store.query_timeout());
        warn!("People search for role {} failed: {}", role, message);
        RoleSearchError { role, message }
    };

    let songs = store
        .query_map(
            &format!(
                "
                SELECT DISTINCT m.song_id, m.song_title, m.song_url
                FROM Pessoas p
                JOIN {table} r ON r.{column} = p.person_id
                JOIN Musicas m ON m.song_id = r.song_id
                WHERE p.person LIKE ?1 ESCAPE '\\'
                ORDER BY m.song_title, m.song_id
                ",
                table = role.table(),
                column = role.person_column(),
            ),
            [&pattern],
            |row| {
                Ok(MatchedSong {
                    id: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    link: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            },
        )
        .map_err(fail)?;
    debug!("People search for role {} reached {} songs", role, songs.len());
    if songs.is_empty() {
        return Ok(Vec::new());
    }

    // Keyed by `Musicas.song_id`, the same key `songs` carries.
    let mut credits: HashMap<RecordId, [BTreeMap<RecordId, String>; 3]> = HashMap::new();
    for credited in Role::ALL {
        let rows = store
            .query_map(
                &format!(
                    "
                    SELECT m.song_id, p.person_id, p.person
                    FROM {credit_table} c
                    JOIN Musicas m ON m.song_id = c.song_id
                    JOIN Pessoas p ON p.person_id = c.{credit_column}
                    WHERE m.song_id IN (
                        SELECT mm.song_id
                        FROM Pessoas mp
                        JOIN {table} r ON r.{column} = mp.person_id
                        JOIN Musicas mm ON mm.song_id = r.song_id
                        WHERE mp.person LIKE ?1 ESCAPE '\\'
                    )
                    ",
                    credit_table = credited.table(),
                    credit_column = credited.person_column(),
                    table = role.table(),
                    column = role.person_column(),
                ),
                [&pattern],
                |row| {
                    Ok((
                        row.get::<_, RecordId>(0)?,
                        row.get::<_, RecordId>(1)?,
                        row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    ))
                },
            )
            .map_err(fail)?;
        for (song_id, person_id, name) in rows {
            credits.entry(song_id).or_default()[credited.index()].insert(person_id, name);
        }
    }

    Ok(songs
        .into_iter()
        .map(|song| {
            let [producers, artists, writers] = credits.remove(&song.id).unwrap_or_default();
            SongRoleResult {
                song_id: song.id,
                song_title: song.title,
                song_link: song.link,
                producers: into_credits(producers),
                artists: into_credits(artists),
                writers: into_credits(writers),
            }
        })
        .collect())
}

fn into_credits(people: BTreeMap<RecordId, String>) -> Vec<Credit> {
    let mut credits: Vec<Credit> = people
        .into_iter()
        .map(|(person_id, name)| Credit { person_id, name })
        .collect();
    credits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.person_id.cmp(&b.person_id)));
    credits
}
