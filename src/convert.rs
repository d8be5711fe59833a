use crate::djay::{CuePoint, DjayTrack, MediaItemUserData};
use crate::rekordbox;

/// Returns a copy of `djay_track` whose cue points are those of
/// `rekordbox_track`, numbered from 1 in Rekordbox order.
///
/// Any existing djay cue points are dropped.
pub fn transfer_cue_points(rekordbox_track: &rekordbox::Track, djay_track: &DjayTrack) -> DjayTrack {
    let mut result = djay_track.clone();
    let user_data = result
        .user_data
        .get_or_insert_with(MediaItemUserData::default);
    user_data.cue_points = rekordbox_track
        .cue_points
        .iter()
        .zip(1..)
        .map(|(cue_point, number)| CuePoint {
            comment: Some(cue_point.name.clone()),
            number,
            time: cue_point.start,
        })
        .collect();
    result
}
