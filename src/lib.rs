//! djtools library
//!
//! Reads and updates the djay Pro 2 media library and moves cue points over
//! from a Rekordbox collection export.

pub mod archive;
pub mod config;
pub mod convert;
pub mod djay;
pub mod matching;
pub mod rekordbox;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use archive::{ArchiveError, Archiver, JsonGraphCodec, ObjectGraphCodec};
pub use convert::transfer_cue_points;
pub use djay::{DjayTrack, Explorer, ExplorerError, Record, TrackQuery};
pub use matching::find_matching_track;
