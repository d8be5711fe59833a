//! Test fixture creation for media libraries and Rekordbox exports

use super::constants::*;
use anyhow::Result;
use djtools::archive::{Archivable, Archiver, JsonGraphCodec};
use djtools::djay::{
    CuePoint, MediaItemAnalyzedData, MediaItemTitleId, MediaItemUserData, Product, Record,
    DATABASE2_TABLE, MEDIA_ITEM_ANALYZED_DATA, MEDIA_ITEM_TITLE_IDS, MEDIA_ITEM_USER_DATA,
    PRODUCTS, PRODUCT_KEY, SUPPORTED_VERSION,
};
use rusqlite::{params, Connection};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn archiver() -> Archiver<Record> {
    Archiver::djay(JsonGraphCodec)
}

fn insert<T: Archivable>(conn: &Connection, collection: &str, key: &str, record: &T) -> Result<()> {
    let data = archiver().archive(record)?;
    conn.execute(
        "INSERT INTO database2 (collection, key, data, metadata) VALUES (?1, ?2, ?3, NULL)",
        params![collection, key, data],
    )?;
    Ok(())
}

fn title(id: &str, title: &str, artist: &str, duration: f64) -> MediaItemTitleId {
    MediaItemTitleId {
        title: title.to_string(),
        artist: artist.to_string(),
        string_representation: format!("{} - {}", artist, title),
        internal_id: id.to_lowercase(),
        duration,
        uuid: id.to_string(),
    }
}

/// Creates a temporary djay media library with 3 tracks.
/// Returns (temp_dir, media_library_db_path)
///
/// Track 1 has user data with one cue point and analysis data, tracks 2 and 3
/// only have a title.
pub fn create_test_media_library() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("MediaLibrary.db");
    let conn = Connection::open(&db_path)?;
    DATABASE2_TABLE.create(&conn)?;

    insert(
        &conn,
        PRODUCTS,
        PRODUCT_KEY,
        &Product {
            use_count: 42,
            version: SUPPORTED_VERSION.to_string(),
            product_id: PRODUCT_KEY.to_string(),
            device_type: "Mac".to_string(),
            ..Default::default()
        },
    )?;

    insert(
        &conn,
        MEDIA_ITEM_TITLE_IDS,
        TRACK_1_ID,
        &title(TRACK_1_ID, TRACK_1_TITLE, ARTIST_1_NAME, TRACK_1_DURATION),
    )?;
    insert(
        &conn,
        MEDIA_ITEM_USER_DATA,
        TRACK_1_ID,
        &MediaItemUserData {
            cue_points: vec![CuePoint {
                comment: Some("Old cue".to_string()),
                number: 1,
                time: 12.0,
            }],
            play_count: 9,
            rating: 4,
            uuid: TRACK_1_ID.to_string(),
            ..Default::default()
        },
    )?;
    insert(
        &conn,
        MEDIA_ITEM_ANALYZED_DATA,
        TRACK_1_ID,
        &MediaItemAnalyzedData {
            bpm: 124.0,
            key_signature_index: 7,
            uuid: TRACK_1_ID.to_string(),
        },
    )?;

    insert(
        &conn,
        MEDIA_ITEM_TITLE_IDS,
        TRACK_2_ID,
        &title(TRACK_2_ID, TRACK_2_TITLE, ARTIST_1_NAME, TRACK_2_DURATION),
    )?;
    insert(
        &conn,
        MEDIA_ITEM_TITLE_IDS,
        TRACK_3_ID,
        &title(TRACK_3_ID, TRACK_3_TITLE, ARTIST_2_NAME, TRACK_3_DURATION),
    )?;

    Ok((dir, db_path))
}

/// Writes the Rekordbox collection export next to the media library.
pub fn create_test_rekordbox_xml(dir: &TempDir) -> Result<PathBuf> {
    let path = dir.path().join("rekordbox.xml");
    fs::write(&path, REKORDBOX_XML)?;
    Ok(path)
}
