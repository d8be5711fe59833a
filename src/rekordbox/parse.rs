use super::models::{CuePoint, Track};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

const COLLECTION: &[u8] = b"COLLECTION";
const TRACK: &str = "TRACK";
const POSITION_MARK: &str = "POSITION_MARK";

#[derive(Debug, Error)]
pub enum RekordboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Invalid {attribute} attribute on {element}: {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: String,
        value: String,
    },
}

/// Where Rekordbox exports its collection by default.
pub fn default_xml_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join("Documents").join("rekordbox.xml"))
}

pub fn parse_xml_file<P: AsRef<Path>>(path: P) -> Result<Vec<Track>, RekordboxError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let tracks = parse_xml_str(&content)?;
    debug!(
        "Parsed {} Rekordbox tracks from {:?}",
        tracks.len(),
        path.as_ref()
    );
    Ok(tracks)
}

/// Parses the tracks of the `COLLECTION` of a `DJ_PLAYLISTS` document.
///
/// `TRACK` elements anywhere else (playlist entries) are references and are
/// skipped.
pub fn parse_xml_str(xml: &str) -> Result<Vec<Track>, RekordboxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut tracks = Vec::new();
    let mut current: Option<Track> = None;
    let mut in_collection = false;
    // number of open elements around the current event
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) => {
                let name = e.name();
                if depth == 1 && name.as_ref() == COLLECTION {
                    in_collection = true;
                } else if in_collection && depth == 2 && name.as_ref() == TRACK.as_bytes() {
                    current = Some(track_from_element(e)?);
                } else if depth == 3 && name.as_ref() == POSITION_MARK.as_bytes() {
                    if let Some(track) = current.as_mut() {
                        track.cue_points.push(cue_point_from_element(e)?);
                    }
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                let name = e.name();
                if in_collection && depth == 2 && name.as_ref() == TRACK.as_bytes() {
                    tracks.push(track_from_element(e)?);
                } else if depth == 3 && name.as_ref() == POSITION_MARK.as_bytes() {
                    if let Some(track) = current.as_mut() {
                        track.cue_points.push(cue_point_from_element(e)?);
                    }
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                let name = e.name();
                if depth == 2 && name.as_ref() == TRACK.as_bytes() {
                    if let Some(track) = current.take() {
                        tracks.push(track);
                    }
                } else if depth == 1 && name.as_ref() == COLLECTION {
                    in_collection = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(tracks)
}

/// Parses every `POSITION_MARK` element of `xml`, wherever it appears.
pub fn parse_position_marks(xml: &str) -> Result<Vec<CuePoint>, RekordboxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut marks = Vec::new();
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.name().as_ref() == POSITION_MARK.as_bytes() =>
            {
                marks.push(cue_point_from_element(e)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(marks)
}

fn xml_error<E: std::fmt::Display>(e: E) -> RekordboxError {
    RekordboxError::Xml(e.to_string())
}

fn track_from_element(e: &BytesStart<'_>) -> Result<Track, RekordboxError> {
    let mut track = Track::default();
    for_each_attribute(e, |key, value| {
        match key {
            b"TrackID" => track.track_id = coerce(TRACK, key, value)?,
            b"Name" => track.name = value.to_string(),
            b"Artist" => track.artist = value.to_string(),
            b"Album" => track.album = value.to_string(),
            b"TotalTime" => track.total_time = coerce(TRACK, key, value)?,
            b"Location" => track.location = value.to_string(),
            _ => {}
        }
        Ok(())
    })?;
    Ok(track)
}

fn cue_point_from_element(e: &BytesStart<'_>) -> Result<CuePoint, RekordboxError> {
    let mut cue_point = CuePoint::default();
    for_each_attribute(e, |key, value| {
        match key {
            b"Name" => cue_point.name = value.to_string(),
            b"Type" => cue_point.mark_type = coerce(POSITION_MARK, key, value)?,
            b"Start" => cue_point.start = coerce(POSITION_MARK, key, value)?,
            b"Num" => cue_point.num = coerce(POSITION_MARK, key, value)?,
            b"Red" => cue_point.red = coerce(POSITION_MARK, key, value)?,
            b"Green" => cue_point.green = coerce(POSITION_MARK, key, value)?,
            b"Blue" => cue_point.blue = coerce(POSITION_MARK, key, value)?,
            _ => {}
        }
        Ok(())
    })?;
    Ok(cue_point)
}

fn for_each_attribute<F>(e: &BytesStart<'_>, mut apply: F) -> Result<(), RekordboxError>
where
    F: FnMut(&[u8], &str) -> Result<(), RekordboxError>,
{
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        let value = attr.unescape_value().map_err(xml_error)?;
        apply(attr.key.as_ref(), &value)?;
    }
    Ok(())
}

fn coerce<T: FromStr>(element: &'static str, key: &[u8], value: &str) -> Result<T, RekordboxError> {
    value
        .trim()
        .parse()
        .map_err(|_| RekordboxError::InvalidAttribute {
            element,
            attribute: String::from_utf8_lossy(key).into_owned(),
            value: value.to_string(),
        })
}
