mod explorer;
mod models;
mod schema;

pub use explorer::{
    default_media_library_path, validate_track, Explorer, ExplorerError, Row, TrackQuery,
};
pub use models::*;
pub use schema::*;
