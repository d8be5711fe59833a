//! Read/write access to a djay Pro 2 media library.

use super::models::{DjayTrack, MediaItemTitleId, Record};
use super::schema::{
    is_supported_version, DATABASE2_TABLE, GLOBAL_MEDIA_ITEM_LOCATIONS,
    LOCAL_MEDIA_ITEM_LOCATIONS, MEDIA_ITEMS, MEDIA_ITEM_ANALYZED_DATA, MEDIA_ITEM_TITLE_IDS,
    MEDIA_ITEM_USER_DATA, PRODUCTS, PRODUCT_KEY, SELECT_ALL_ROWS, TRACK_COLLECTIONS,
    UPDATE_ROW_DATA,
};
use crate::archive::{ArchiveError, Archiver};
use rusqlite::{params, Connection, OpenFlags};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Two titles are the same length when their durations differ by at most this
/// many seconds.
const DURATION_TOLERANCE_SECS: f64 = 0.01;

/// Location of the media library in a default djay Pro 2 installation.
///
/// djay writes its rows as binary keyed archives. Reading this file needs an
/// [`ObjectGraphCodec`](crate::archive::ObjectGraphCodec) for that format;
/// the bundled JSON codec fails on them with [`ArchiveError::Codec`].
pub fn default_media_library_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join("Music")
            .join("djay Pro 2")
            .join("djay Media Library.djayMediaLibrary")
            .join("MediaLibrary.db")
    })
}

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Media library file not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Incompatible media library table: {0}")]
    IncompatibleTable(String),

    #[error("No products row found in the media library. Unsupported djay version?")]
    MissingCompatibilityRow,

    #[error("Unsupported djay Pro 2 version: {0}")]
    UnsupportedVersion(String),

    #[error("Media library not loaded")]
    NotLoaded,

    #[error("At least one of id, artist, title or duration is required")]
    BadQuery,

    #[error("Track not found for {0}")]
    NotFound(TrackQuery),

    #[error("More than one track matched: {}", .ids.join(", "))]
    Ambiguous { ids: Vec<String> },

    #[error("Malformed track: {0}")]
    MalformedTrack(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Collection {collection} holds an unexpected {class} record")]
    UnexpectedRecord {
        collection: String,
        class: &'static str,
    },

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// One row of the `database2` table.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub rowid: i64,
    pub collection: String,
    pub key: String,
    pub data: Vec<u8>,
    pub metadata: Option<Vec<u8>>,
}

/// Filters for [`Explorer::find_track`]. Set filters are combined with AND.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackQuery {
    pub id: Option<String>,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
}

impl TrackQuery {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.artist.is_none() && self.title.is_none() && self.duration.is_none()
    }

    fn matches(&self, title: &MediaItemTitleId) -> bool {
        if let Some(artist) = &self.artist {
            if title.artist != *artist {
                return false;
            }
        }
        if let Some(name) = &self.title {
            if title.title != *name {
                return false;
            }
        }
        if let Some(duration) = self.duration {
            if (title.duration - duration).abs() > DURATION_TOLERANCE_SECS {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for TrackQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={:?} artist={:?} title={:?} duration={:?}",
            self.id, self.artist, self.title, self.duration
        )
    }
}

/// In-memory view of a djay media library.
///
/// [`Explorer::load`] snapshots every row of the database; all reads are
/// answered from that snapshot and fail with [`ExplorerError::NotLoaded`]
/// until a load succeeds. A connection is only held for the duration of a
/// load or a save.
pub struct Explorer {
    db_path: PathBuf,
    archiver: Archiver<Record>,
    rows: Option<Vec<Row>>,
}

impl Explorer {
    pub fn new<P: Into<PathBuf>>(db_path: P, archiver: Archiver<Record>) -> Self {
        Explorer {
            db_path: db_path.into(),
            archiver,
            rows: None,
        }
    }

    /// Creates an explorer and loads the library at `db_path`.
    pub fn open<P: Into<PathBuf>>(db_path: P, archiver: Archiver<Record>) -> Result<Self, ExplorerError> {
        let mut explorer = Explorer::new(db_path, archiver);
        explorer.load()?;
        Ok(explorer)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_loaded(&self) -> bool {
        self.rows.is_some()
    }

    /// Replaces the snapshot with the current database content and checks
    /// that it was written by a supported djay version.
    pub fn load(&mut self) -> Result<(), ExplorerError> {
        self.rows = None;
        if !self.db_path.exists() {
            return Err(ExplorerError::StoreNotFound(self.db_path.clone()));
        }

        let rows = self.read_rows()?;
        self.verify_version(&rows)?;

        info!(
            "Loaded {} rows from media library {:?}",
            rows.len(),
            self.db_path
        );
        self.rows = Some(rows);
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<Row>, ExplorerError> {
        let conn = Connection::open_with_flags(&self.db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        DATABASE2_TABLE
            .validate(&conn)
            .map_err(|e| ExplorerError::IncompatibleTable(e.to_string()))?;

        let mut stmt = conn.prepare(SELECT_ALL_ROWS)?;
        let rows = stmt
            .query_map(params![], |row| {
                Ok(Row {
                    rowid: row.get(0)?,
                    collection: row.get(1)?,
                    key: row.get(2)?,
                    data: row.get::<_, Option<Vec<u8>>>(3)?.unwrap_or_default(),
                    metadata: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn verify_version(&self, rows: &[Row]) -> Result<(), ExplorerError> {
        let product_row = rows
            .iter()
            .find(|row| row.collection == PRODUCTS && row.key == PRODUCT_KEY)
            .ok_or(ExplorerError::MissingCompatibilityRow)?;

        let product = match self.archiver.unarchive(&product_row.data)? {
            Record::Product(product) => product,
            other => {
                return Err(ExplorerError::UnexpectedRecord {
                    collection: PRODUCTS.to_string(),
                    class: other.class_name(),
                })
            }
        };

        if !is_supported_version(&product.version) {
            return Err(ExplorerError::UnsupportedVersion(product.version));
        }
        debug!("Media library written by djay {}", product.version);
        Ok(())
    }

    pub fn rows(&self) -> Result<&[Row], ExplorerError> {
        self.rows.as_deref().ok_or(ExplorerError::NotLoaded)
    }

    /// Rows matching `key` and `collection`, in table order. `None` matches
    /// anything.
    pub fn get_rows(
        &self,
        key: Option<&str>,
        collection: Option<&str>,
    ) -> Result<Vec<&Row>, ExplorerError> {
        Ok(self
            .rows()?
            .iter()
            .filter(|row| key.map_or(true, |key| row.key == key))
            .filter(|row| collection.map_or(true, |collection| row.collection == collection))
            .collect())
    }

    pub fn get_track_ids(&self) -> Result<Vec<String>, ExplorerError> {
        Ok(self
            .get_rows(None, Some(MEDIA_ITEM_TITLE_IDS))?
            .into_iter()
            .map(|row| row.key.clone())
            .collect())
    }

    /// Assembles the track stored under `track_id` from all of its rows.
    ///
    /// Fragments without a row stay `None`, including the title.
    pub fn load_track(&self, track_id: &str) -> Result<DjayTrack, ExplorerError> {
        let mut track = DjayTrack::default();
        for row in self.get_rows(Some(track_id), None)? {
            if !TRACK_COLLECTIONS.contains(&row.collection.as_str()) {
                return Err(ExplorerError::UnknownCollection(row.collection.clone()));
            }
            let record = self.archiver.unarchive(&row.data)?;
            assign_fragment(&mut track, &row.collection, record)?;
        }
        debug!("Loaded track {}", track_id);
        Ok(track)
    }

    /// Finds the single track matching every filter set in `query`.
    pub fn find_track(&self, query: &TrackQuery) -> Result<DjayTrack, ExplorerError> {
        if query.is_empty() {
            return Err(ExplorerError::BadQuery);
        }

        let mut found = Vec::new();
        for row in self.get_rows(None, Some(MEDIA_ITEM_TITLE_IDS))? {
            if let Some(id) = &query.id {
                if row.key != *id {
                    continue;
                }
            }
            let title = match self.archiver.unarchive(&row.data)? {
                Record::TitleId(title) => title,
                other => {
                    return Err(ExplorerError::UnexpectedRecord {
                        collection: row.collection.clone(),
                        class: other.class_name(),
                    })
                }
            };
            if query.matches(&title) {
                found.push((row.key.clone(), self.load_track(&row.key)?));
            }
        }

        match found.len() {
            0 => Err(ExplorerError::NotFound(query.clone())),
            1 => Ok(found.remove(0).1),
            _ => Err(ExplorerError::Ambiguous {
                ids: found.into_iter().map(|(id, _)| id).collect(),
            }),
        }
    }

    /// Writes the user data, title and analysis of `track` back to the
    /// database, then reloads.
    ///
    /// Locations and the media item are never written.
    pub fn save_track(&mut self, track: &DjayTrack) -> Result<(), ExplorerError> {
        self.rows()?;
        let title = validate_track(track)?;

        let mut updates = Vec::new();
        if let Some(user_data) = &track.user_data {
            updates.push((MEDIA_ITEM_USER_DATA, self.archiver.archive(user_data)?));
        }
        updates.push((MEDIA_ITEM_TITLE_IDS, self.archiver.archive(title)?));
        if let Some(analysis) = &track.analysis {
            updates.push((MEDIA_ITEM_ANALYZED_DATA, self.archiver.archive(analysis)?));
        }

        {
            let mut conn =
                Connection::open_with_flags(&self.db_path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
            let tx = conn.transaction()?;
            for (collection, data) in &updates {
                let changed = tx.execute(UPDATE_ROW_DATA, params![data, collection, title.uuid])?;
                if changed == 0 {
                    warn!(
                        "No {} row for track {}, nothing updated",
                        collection, title.uuid
                    );
                }
            }
            tx.commit()?;
        }
        info!("Saved track {}", title.uuid);

        self.load()
    }

    pub fn get_all_tracks(&self) -> Result<Vec<DjayTrack>, ExplorerError> {
        self.get_track_ids()?
            .iter()
            .map(|id| self.load_track(id))
            .collect()
    }
}

fn assign_fragment(
    track: &mut DjayTrack,
    collection: &str,
    record: Record,
) -> Result<(), ExplorerError> {
    match (collection, record) {
        (MEDIA_ITEM_USER_DATA, Record::UserData(user_data)) => track.user_data = Some(user_data),
        (MEDIA_ITEM_TITLE_IDS, Record::TitleId(title)) => track.title = Some(title),
        (MEDIA_ITEM_ANALYZED_DATA, Record::AnalyzedData(analysis)) => {
            track.analysis = Some(analysis)
        }
        (LOCAL_MEDIA_ITEM_LOCATIONS, Record::Location(location)) => {
            track.local_location = Some(location)
        }
        (GLOBAL_MEDIA_ITEM_LOCATIONS, Record::Location(location)) => {
            track.global_location = Some(location)
        }
        (MEDIA_ITEMS, Record::MediaItem(media_item)) => track.media_item = Some(media_item),
        (collection, other) => {
            return Err(ExplorerError::UnexpectedRecord {
                collection: collection.to_string(),
                class: other.class_name(),
            })
        }
    }
    Ok(())
}

/// Checks that `track` has a title and that every fragment belongs to that
/// title. Returns the title.
///
/// User data without an identifier is accepted: it is created that way when
/// a track gets cue points for the first time.
pub fn validate_track(track: &DjayTrack) -> Result<&MediaItemTitleId, ExplorerError> {
    let title = track
        .title
        .as_ref()
        .ok_or_else(|| ExplorerError::MalformedTrack("track has no title".to_string()))?;

    let user_data = track
        .user_data
        .as_ref()
        .map(|f| f.uuid.as_str())
        .filter(|uuid| !uuid.is_empty());
    let fragments = [
        ("user_data", user_data),
        ("analysis", track.analysis.as_ref().map(|f| f.uuid.as_str())),
        (
            "local_location",
            track.local_location.as_ref().map(|f| f.uuid.as_str()),
        ),
        (
            "global_location",
            track.global_location.as_ref().map(|f| f.uuid.as_str()),
        ),
        ("media_item", track.media_item.as_ref().map(|f| f.uuid.as_str())),
    ];
    for (name, uuid) in fragments {
        match uuid {
            Some(uuid) if uuid != title.uuid => {
                return Err(ExplorerError::MalformedTrack(format!(
                    "title UUID ({}) doesn't match {} UUID ({})",
                    title.uuid, name, uuid
                )));
            }
            _ => {}
        }
    }
    Ok(title)
}
