//! Pairing of djay tracks with Rekordbox tracks.
//!
//! The two libraries share no identifiers, so tracks are correlated by
//! content: length first, then title and artist.

use crate::djay::{DjayTrack, MediaItemTitleId};
use crate::rekordbox::Track;
use tracing::debug;

/// Rekordbox stores whole seconds, djay fractional ones.
const DURATION_WINDOW_SECS: f64 = 1.0;

fn duration_matches(title: &MediaItemTitleId, candidate: &Track) -> bool {
    (title.duration - candidate.total_time as f64).abs() < DURATION_WINDOW_SECS
}

fn title_matches(title: &MediaItemTitleId, candidate: &Track) -> bool {
    title.title == candidate.name
        && title.artist == candidate.artist
        && duration_matches(title, candidate)
}

/// Returns the Rekordbox track that `track` most likely is.
///
/// A candidate that is the only one of compatible length wins outright.
/// When several are, the first one with the same title and artist wins; the
/// order of `candidates` decides ties.
pub fn find_matching_track<'a, I>(track: &DjayTrack, candidates: I) -> Option<&'a Track>
where
    I: IntoIterator<Item = &'a Track>,
{
    let title = track.title.as_ref()?;
    let same_length: Vec<&Track> = candidates
        .into_iter()
        .filter(|candidate| duration_matches(title, candidate))
        .collect();

    match same_length.as_slice() {
        [] => None,
        [only] => Some(*only),
        several => {
            debug!(
                "{} candidates of matching length for {:?}, comparing titles",
                several.len(),
                title.string_representation
            );
            several
                .iter()
                .copied()
                .find(|candidate| title_matches(title, candidate))
        }
    }
}
