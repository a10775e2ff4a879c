//! Fixture collections and packages shared by the unit tests.

use std::{
    fs::File,
    io::Write,
    path::{
        Path,
        PathBuf,
    },
};

use rusqlite::{
    params,
    Connection,
};
use zip::{
    write::SimpleFileOptions,
    ZipWriter,
};

use crate::core::WordpackError;

pub const FIXTURE_BASIC_MODEL_ID: i64 = 1_342_697_561_419;
pub const FIXTURE_REVERSED_MODEL_ID: i64 = 1_342_697_561_420;
pub const FIXTURE_DEFAULT_DECK_ID: i64 = 1;
pub const FIXTURE_GERMAN_DECK_ID: i64 = 1_700_000_000_001;
pub const FIXTURE_FILTERED_DECK_ID: i64 = 1_700_000_000_002;
pub const FIXTURE_MEDIA_BYTES: &[u8] = b"\x89PNG fake image";

const LEGACY_SCHEMA: &str = r#"
CREATE TABLE col (
    id              integer primary key,
    crt             integer not null,
    mod             integer not null,
    scm             integer not null,
    ver             integer not null,
    dty             integer not null,
    usn             integer not null,
    ls              integer not null,
    conf            text not null,
    models          text not null,
    decks           text not null,
    dconf           text not null,
    tags            text not null
);
CREATE TABLE notes (
    id              integer primary key,
    guid            text not null,
    mid             integer not null,
    mod             integer not null,
    usn             integer not null,
    tags            text not null,
    flds            text not null,
    sfld            integer not null,
    csum            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE cards (
    id              integer primary key,
    nid             integer not null,
    did             integer not null,
    ord             integer not null,
    mod             integer not null,
    usn             integer not null,
    type            integer not null,
    queue           integer not null,
    due             integer not null,
    ivl             integer not null,
    factor          integer not null,
    reps            integer not null,
    lapses          integer not null,
    left            integer not null,
    odue            integer not null,
    odid            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE revlog (
    id              integer primary key,
    cid             integer not null,
    usn             integer not null,
    ease            integer not null,
    ivl             integer not null,
    lastIvl         integer not null,
    factor          integer not null,
    time            integer not null,
    type            integer not null
);
CREATE TABLE graves (
    usn             integer not null,
    oid             integer not null,
    type            integer not null
);
"#;

fn models_json() -> String {
    serde_json::json!({
        (FIXTURE_BASIC_MODEL_ID.to_string()): {
            "id": FIXTURE_BASIC_MODEL_ID,
            "name": "Basic",
            "type": 0,
            "sortf": 0,
            "tmpls": [{ "name": "Card 1", "ord": 0, "qfmt": "{{Front}}", "afmt": "{{Back}}" }],
            "flds": [{ "name": "Front", "ord": 0 }, { "name": "Back", "ord": 1 }]
        },
        (FIXTURE_REVERSED_MODEL_ID.to_string()): {
            "id": FIXTURE_REVERSED_MODEL_ID,
            "name": "Basic (and reversed card)",
            "type": 0,
            "sortf": 0,
            "tmpls": [
                { "name": "Card 2", "ord": 1, "qfmt": "{{Back}}", "afmt": "{{Front}}" },
                { "name": "Card 1", "ord": 0, "qfmt": "{{Front}}", "afmt": "{{Back}}" }
            ],
            "flds": [{ "name": "Front", "ord": 0 }, { "name": "Back", "ord": 1 }]
        }
    })
    .to_string()
}

fn decks_json() -> String {
    serde_json::json!({
        (FIXTURE_DEFAULT_DECK_ID.to_string()): { "id": FIXTURE_DEFAULT_DECK_ID, "name": "Default", "dyn": 0 },
        (FIXTURE_GERMAN_DECK_ID.to_string()): { "id": FIXTURE_GERMAN_DECK_ID, "name": "German", "dyn": 0 },
        (FIXTURE_FILTERED_DECK_ID.to_string()): { "id": FIXTURE_FILTERED_DECK_ID, "name": "Due today", "dyn": 1 }
    })
    .to_string()
}

/// Creates an empty legacy-schema collection with two models, two regular
/// decks and one filtered deck.
pub fn create_collection(path: &Path) -> Result<(), WordpackError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(LEGACY_SCHEMA)?;
    conn.execute(
        "INSERT INTO col VALUES (1, 1700000000, 0, 0, 11, 0, 0, 0, '{}', ?1, ?2, '{}', '{}')",
        params![models_json(), decks_json()],
    )?;
    Ok(())
}

/// Builds `<dir>/deck.apkg` holding a fresh collection, a media map and one
/// media file.
pub fn create_package(dir: &Path) -> Result<PathBuf, WordpackError> {
    let db_path = dir.join("fixture.anki21");
    create_collection(&db_path)?;
    let db_bytes = std::fs::read(&db_path)?;

    let apkg_path = dir.join("deck.apkg");
    let mut zip = ZipWriter::new(File::create(&apkg_path)?);
    let options = SimpleFileOptions::default();

    zip.start_file("collection.anki21", options)?;
    zip.write_all(&db_bytes)?;
    zip.start_file("media", options)?;
    zip.write_all(br#"{"0": "haus.png"}"#)?;
    zip.start_file("0", options)?;
    zip.write_all(FIXTURE_MEDIA_BYTES)?;
    zip.finish()?;

    Ok(apkg_path)
}
