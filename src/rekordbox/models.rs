use serde::Serialize;

/// A track of the Rekordbox collection (`TRACK` element).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Track {
    pub track_id: i64,
    pub name: String,
    pub artist: String,
    pub album: String,
    /// Length in whole seconds.
    pub total_time: i64,
    pub location: String,
    pub cue_points: Vec<CuePoint>,
}

/// A memory cue or hot cue (`POSITION_MARK` element).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CuePoint {
    pub name: String,
    pub mark_type: i64,
    /// Position in seconds.
    pub start: f64,
    /// Hot cue slot, or -1 for memory cues.
    pub num: i64,
    pub red: i64,
    pub green: i64,
    pub blue: i64,
}

impl Default for CuePoint {
    fn default() -> Self {
        CuePoint {
            name: String::new(),
            mark_type: 0,
            start: 0.0,
            num: 0,
            red: 255,
            green: 255,
            blue: 255,
        }
    }
}
