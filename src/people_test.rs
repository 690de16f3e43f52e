use crate::error::RoleSearchError;
use crate::people::*;
use crate::store::{RecordId, Store};
use crate::testing;

fn titles(results: &[SongRoleResult]) -> Vec<&str> {
    results.iter().map(|r| r.song_title.as_str()).collect()
}

#[test]
fn test_empty_term_matches_nothing() {
    let (config, _temp_dir) = testing::seeded_store();
    let store = Store::open(&config).unwrap();

    for term in ["", "   "] {
        assert_eq!(search_people(&store, term), PeopleSearch::empty());
        for role in Role::ALL {
            assert!(search_by_role(&store, role, term).unwrap().is_empty());
        }
    }
}

#[test]
fn test_substring_match_crosses_roles() {
    let (config, _temp_dir) = testing::store_with(
        "
        INSERT INTO Musicas (song_id, song_title, song_url) VALUES (1, 'S', 'https://x/s');
        INSERT INTO Pessoas (person_id, person) VALUES (1, 'Jon Smith'), (2, 'Ana Jones');
        INSERT INTO Escritores (writer_id, song_id) VALUES (1, 1);
        INSERT INTO Artistas (artist_id, song_id) VALUES (2, 1);
        ",
    );
    let store = Store::open(&config).unwrap();

    let results = search_people(&store, "Jon");
    assert!(results.producer.as_ref().unwrap().is_empty());

    let writers = results.escritor.as_ref().unwrap();
    assert_eq!(titles(writers), vec!["S"]);
    assert_eq!(writers[0].names(Role::Writer), vec!["Jon Smith"]);
    assert_eq!(writers[0].names(Role::Artist), vec!["Ana Jones"]);
    assert_eq!(writers[0].song_link, "https://x/s");

    let artists = results.artista.as_ref().unwrap();
    assert_eq!(titles(artists), vec!["S"]);
    assert_eq!(artists[0].names(Role::Writer), vec!["Jon Smith"]);
}

#[test]
fn test_writer_search_aggregates_all_roles() {
    let (config, _temp_dir) = testing::seeded_store();
    let store = Store::open(&config).unwrap();

    let results = search_by_role(&store, Role::Writer, "Jon").unwrap();
    assert_eq!(titles(&results), vec!["Cardigan", "Exile"]);

    let cardigan = &results[0];
    assert_eq!(cardigan.song_id, RecordId::Int(2));
    // Jon Smith is listed twice as a writer on Cardigan.
    assert_eq!(cardigan.names(Role::Writer), vec!["Jack Antonoff", "Jon Smith"]);
    assert_eq!(cardigan.names(Role::Artist), vec!["Ana Jones"]);
    assert!(cardigan.producers.is_empty());

    let exile = &results[1];
    assert_eq!(exile.names(Role::Writer), vec!["Jon Smith"]);
    assert_eq!(exile.names(Role::Producer), vec!["Jack Antonoff"]);
    assert!(exile.artists.is_empty());
}

#[test]
fn test_song_reached_twice_appears_once() {
    let (config, _temp_dir) = testing::seeded_store();
    let store = Store::open(&config).unwrap();

    // Both Max Martins produced Love Story.
    let results = search_by_role(&store, Role::Producer, "max").unwrap();
    assert_eq!(titles(&results), vec!["Love Story"]);

    // Two people share the name; dedup is by identity, so both are kept.
    let producers = &results[0].producers;
    assert_eq!(producers.len(), 2);
    assert_eq!(
        producers.iter().map(|c| c.person_id.clone()).collect::<Vec<_>>(),
        vec![RecordId::Int(3), RecordId::Int(5)]
    );
    assert_eq!(results[0].names(Role::Artist), vec!["Jack Antonoff"]);
}

#[test]
fn test_no_song_repeats_within_a_role() {
    let (config, _temp_dir) = testing::seeded_store();
    let store = Store::open(&config).unwrap();

    for term in ["a", "o", "n", "Max", "Jack"] {
        for role in Role::ALL {
            let results = search_by_role(&store, role, term).unwrap();
            let mut ids: Vec<_> = results.iter().map(|r| r.song_id.clone()).collect();
            let total = ids.len();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), total, "duplicate song for {role} / {term}");
        }
    }
}

#[test]
fn test_results_ordered_by_title() {
    let (config, _temp_dir) = testing::seeded_store();
    let store = Store::open(&config).unwrap();

    let results = search_by_role(&store, Role::Artist, "a").unwrap();
    assert_eq!(titles(&results), vec!["Cardigan", "Love Story"]);
}

#[test]
fn test_match_is_case_insensitive_and_literal() {
    let (config, _temp_dir) = testing::seeded_store();
    let store = Store::open(&config).unwrap();

    let results = search_by_role(&store, Role::Writer, "JON SMITH").unwrap();
    assert_eq!(titles(&results), vec!["Cardigan", "Exile"]);

    // Wildcards in the term are literal characters, not patterns.
    for term in ["%", "_", "J%n"] {
        for role in Role::ALL {
            assert!(search_by_role(&store, role, term).unwrap().is_empty(), "{term} matched for {role}");
        }
    }
}

#[test]
fn test_role_channels_fail_independently() {
    let results = PeopleSearch::collect(|role| match role {
        Role::Artist => Err(RoleSearchError {
            role,
            message: "boom".to_string(),
        }),
        _ => Ok(Vec::new()),
    });

    assert!(results.producer.is_ok());
    assert!(results.escritor.is_ok());
    let errors = results.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].role, Role::Artist);
    assert_eq!(errors[0].to_string(), "Error accessing database for artist search: boom");
}

#[test]
fn test_store_failure_is_isolated_per_role() {
    let seed = format!("{}\nDROP TABLE Escritores;", testing::SEED);
    let (config, _temp_dir) = testing::store_with(&seed);
    let store = Store::open(&config).unwrap();

    let results = search_people(&store, "Jon");
    // Nobody named like "Jon" produces anything, so the producer channel never touches writers.
    assert_eq!(results.producer, Ok(Vec::new()));
    assert_eq!(results.artista.as_ref().unwrap_err().role, Role::Artist);
    assert_eq!(results.escritor.as_ref().unwrap_err().role, Role::Writer);
}

#[test]
fn test_credits_found_when_role_table_stores_text_ids() {
    let (config, _temp_dir) = testing::store_with(
        "
        DROP TABLE Escritores;
        CREATE TABLE Escritores (writer_id TEXT, song_id TEXT);
        INSERT INTO Musicas (song_id, song_title, song_url) VALUES (1, 'Cardigan', 'https://x/cardigan');
        INSERT INTO Pessoas (person_id, person) VALUES (1, 'Jon Smith'), (2, 'Ana Jones');
        INSERT INTO Escritores (writer_id, song_id) VALUES ('1', '1');
        INSERT INTO Artistas (artist_id, song_id) VALUES (2, 1);
        ",
    );
    let store = Store::open(&config).unwrap();

    let results = search_by_role(&store, Role::Writer, "Jon").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].song_id, RecordId::Int(1));
    assert_eq!(results[0].names(Role::Writer), vec!["Jon Smith"]);
    assert_eq!(results[0].names(Role::Artist), vec!["Ana Jones"]);

    let results = search_by_role(&store, Role::Artist, "Ana").unwrap();
    assert_eq!(results[0].names(Role::Writer), vec!["Jon Smith"]);
}

#[test]
fn test_people_search_serialization() {
    let (config, _temp_dir) = testing::seeded_store();
    let store = Store::open(&config).unwrap();

    let json = serde_json::to_value(search_people(&store, "Antonoff")).unwrap();
    let first = &json["producer"]["Ok"][0];
    assert_eq!(first["song_title"], "Exile");
    assert_eq!(first["producers"][0]["name"], "Jack Antonoff");
    assert_eq!(first["producers"][0]["person_id"], 4);
    assert_eq!(first["artists"], serde_json::json!([]));
}
