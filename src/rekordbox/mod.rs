//! Rekordbox XML collection exports.

mod models;
mod parse;

pub use models::{CuePoint, Track};
pub use parse::{
    default_xml_path, parse_position_marks, parse_xml_file, parse_xml_str, RekordboxError,
};
