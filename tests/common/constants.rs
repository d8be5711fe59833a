//! Shared constants for end-to-end tests
//!
//! When the fixture libraries change, update only this file.

// ============================================================================
// djay Media Library
// ============================================================================

/// Key of "Opening Track" by The Test Band, 301.4s, has user data
pub const TRACK_1_ID: &str = "8A7F0001-0000-4000-8000-000000000001";

/// Key of "Second Song" by The Test Band, 245.0s, no user data
pub const TRACK_2_ID: &str = "8A7F0002-0000-4000-8000-000000000002";

/// Key of "Lonely Tune" by Jazz Ensemble, 180.2s, no Rekordbox counterpart
pub const TRACK_3_ID: &str = "8A7F0003-0000-4000-8000-000000000003";

pub const TRACK_1_TITLE: &str = "Opening Track";
pub const TRACK_2_TITLE: &str = "Second Song";
pub const TRACK_3_TITLE: &str = "Lonely Tune";

pub const ARTIST_1_NAME: &str = "The Test Band";
pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

pub const TRACK_1_DURATION: f64 = 301.4;
pub const TRACK_2_DURATION: f64 = 245.0;
pub const TRACK_3_DURATION: f64 = 180.2;

// ============================================================================
// Rekordbox Collection
// ============================================================================

/// Collection export with two matching tracks and a decoy of the same
/// length as track 1.
pub const REKORDBOX_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DJ_PLAYLISTS Version="1.0.0">
  <PRODUCT Name="rekordbox" Version="5.6.0" Company="Pioneer DJ"/>
  <COLLECTION Entries="3">
    <TRACK TrackID="10" Name="Decoy" Artist="Someone Else" Album="" TotalTime="301"
           Location="file://localhost/Music/decoy.mp3">
      <POSITION_MARK Name="Wrong" Type="0" Start="5.0" Num="-1"/>
    </TRACK>
    <TRACK TrackID="11" Name="Opening Track" Artist="The Test Band" Album="First Album"
           TotalTime="301" Location="file://localhost/Music/opening.mp3">
      <POSITION_MARK Name="Intro" Type="0" Start="0.5" Num="-1"/>
      <POSITION_MARK Name="Drop" Type="0" Start="64.25" Num="0" Red="40" Green="226" Blue="20"/>
      <POSITION_MARK Name="" Type="0" Start="125.0" Num="1"/>
    </TRACK>
    <TRACK TrackID="12" Name="Second Song (Edit)" Artist="The Test Band" Album="First Album"
           TotalTime="245" Location="file://localhost/Music/second.mp3">
      <POSITION_MARK Name="Verse" Type="0" Start="32.0" Num="-1"/>
    </TRACK>
  </COLLECTION>
</DJ_PLAYLISTS>
"#;
