//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{create_test_media_library, archiver, TRACK_1_ID};
//! use djtools::Explorer;
//!
//! #[test]
//! fn test_load_track() {
//!     let (_dir, db_path) = create_test_media_library().unwrap();
//!     let explorer = Explorer::open(&db_path, archiver()).unwrap();
//!     assert!(explorer.load_track(TRACK_1_ID).unwrap().title.is_some());
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{archiver, create_test_media_library, create_test_rekordbox_xml};
