//! End-to-end tests for moving Rekordbox cue points into a djay media library

mod common;

use common::*;
use djtools::djay::{MediaItemTitleId, TrackQuery};
use djtools::{find_matching_track, rekordbox, transfer_cue_points, Explorer, ExplorerError};
use std::process::Command;

fn transfer_all(explorer: &mut Explorer, rekordbox_tracks: &[rekordbox::Track]) -> usize {
    let mut transferred = 0;
    for track in explorer.get_all_tracks().unwrap() {
        if let Some(source) = find_matching_track(&track, rekordbox_tracks) {
            explorer
                .save_track(&transfer_cue_points(source, &track))
                .unwrap();
            transferred += 1;
        }
    }
    transferred
}

#[test]
fn test_transfer_cues_through_media_library() {
    let (dir, db_path) = create_test_media_library().unwrap();
    let xml_path = create_test_rekordbox_xml(&dir).unwrap();
    let rekordbox_tracks = rekordbox::parse_xml_file(&xml_path).unwrap();
    let mut explorer = Explorer::open(&db_path, archiver()).unwrap();

    assert_eq!(transfer_all(&mut explorer, &rekordbox_tracks), 2);

    // Track 1 matched the same-named candidate, not the decoy of equal length
    let track_1 = explorer.load_track(TRACK_1_ID).unwrap();
    let user_data = track_1.user_data.as_ref().unwrap();
    let cues: Vec<_> = user_data
        .cue_points
        .iter()
        .map(|cue| (cue.comment.as_deref(), cue.number, cue.time))
        .collect();
    assert_eq!(
        cues,
        vec![
            (Some("Intro"), 1, 0.5),
            (Some("Drop"), 2, 64.25),
            // unnamed Rekordbox cues are stored with their timestamp label
            (Some("2:05"), 3, 125.0),
        ]
    );
    assert_eq!(user_data.play_count, 9);
    assert_eq!(user_data.rating, 4);
    assert_eq!(track_1.analysis.as_ref().unwrap().bpm, 124.0);
    assert_eq!(track_1.title.as_ref().unwrap().title, TRACK_1_TITLE);

    // Track 2 had no user data row, so only its title row could be updated
    let track_2 = explorer.load_track(TRACK_2_ID).unwrap();
    assert!(track_2.user_data.is_none());
    assert_eq!(track_2.title.unwrap().duration, TRACK_2_DURATION);

    // Track 3 has no counterpart and is untouched
    let track_3 = explorer.load_track(TRACK_3_ID).unwrap();
    assert!(track_3.user_data.is_none());
}

#[test]
fn test_reopened_library_sees_saved_cues() {
    let (dir, db_path) = create_test_media_library().unwrap();
    let xml_path = create_test_rekordbox_xml(&dir).unwrap();
    let rekordbox_tracks = rekordbox::parse_xml_file(&xml_path).unwrap();
    transfer_all(
        &mut Explorer::open(&db_path, archiver()).unwrap(),
        &rekordbox_tracks,
    );

    let explorer = Explorer::open(&db_path, archiver()).unwrap();
    let track = explorer
        .find_track(&TrackQuery {
            title: Some(TRACK_1_TITLE.to_string()),
            artist: Some(ARTIST_1_NAME.to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(track.user_data.unwrap().cue_points.len(), 3);
}

#[test]
fn test_find_track_lookups() {
    let (_dir, db_path) = create_test_media_library().unwrap();
    let explorer = Explorer::open(&db_path, archiver()).unwrap();

    assert_eq!(
        explorer.get_track_ids().unwrap(),
        vec![TRACK_1_ID, TRACK_2_ID, TRACK_3_ID]
    );

    let by_duration = explorer
        .find_track(&TrackQuery {
            duration: Some(TRACK_3_DURATION),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_duration.uuid(), Some(TRACK_3_ID));

    match explorer.find_track(&TrackQuery {
        artist: Some(ARTIST_1_NAME.to_string()),
        ..Default::default()
    }) {
        Err(ExplorerError::Ambiguous { ids }) => assert_eq!(ids, vec![TRACK_1_ID, TRACK_2_ID]),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_cli_show_track_prints_json() {
    let (_dir, db_path) = create_test_media_library().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_djtools"))
        .arg("--media-library")
        .arg(&db_path)
        .arg("--rekordbox-xml")
        .arg("/unused/rekordbox.xml")
        .args(["show-track", TRACK_1_ID])
        .env("LOG_LEVEL", "warn")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "djtools failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"]["title"], TRACK_1_TITLE);
    assert_eq!(json["user_data"]["play_count"], 9);
    assert!(json["media_item"].is_null());
}

#[test]
fn test_cli_dry_run_leaves_library_untouched() {
    let (dir, db_path) = create_test_media_library().unwrap();
    let xml_path = create_test_rekordbox_xml(&dir).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_djtools"))
        .arg("--media-library")
        .arg(&db_path)
        .arg("--rekordbox-xml")
        .arg(&xml_path)
        .args(["transfer-cues", "--dry-run"])
        .env("LOG_LEVEL", "warn")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "djtools failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("\"rekordbox_track_id\": 11"));

    let explorer = Explorer::open(&db_path, archiver()).unwrap();
    let track = explorer.load_track(TRACK_1_ID).unwrap();
    let cues = track.user_data.unwrap().cue_points;
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].comment.as_deref(), Some("Old cue"));
}

#[test]
fn test_title_fragment_survives_save_unchanged() {
    let (_dir, db_path) = create_test_media_library().unwrap();
    let mut explorer = Explorer::open(&db_path, archiver()).unwrap();

    let before: MediaItemTitleId = explorer.load_track(TRACK_3_ID).unwrap().title.unwrap();
    let track = explorer.load_track(TRACK_3_ID).unwrap();
    explorer.save_track(&track).unwrap();

    assert_eq!(explorer.load_track(TRACK_3_ID).unwrap().title.unwrap(), before);
}
