use crate::archive::{
    Archivable, ArchiveNode, ArchiveValue, Archiver, ClassRegistry, FieldTable, MutableData,
    ObjectGraphCodec, Url,
};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MediaItemTitleId {
    pub title: String,
    pub artist: String,
    pub string_representation: String,
    pub internal_id: String,
    pub duration: f64,
    pub uuid: String,
}

crate::archived_record!(MediaItemTitleId, "ADCMediaItemTitleID", {
    title => "title",
    artist => "artist",
    string_representation => "stringRepresentation",
    internal_id => "internalID",
    duration => "duration",
    uuid => "uuid",
});

impl Archivable for MediaItemTitleId {}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CuePoint {
    pub comment: Option<String>,
    pub number: i64,
    pub time: f64,
}

crate::archived_record!(CuePoint, "ADCCuePoint", {
    comment => "comment",
    number => "number",
    time => "time",
});

impl CuePoint {
    /// `minutes:seconds` label of the cue position, e.g. `1:05`.
    pub fn timestamp_label(&self) -> String {
        let seconds = self.time.trunc() as i64;
        format!("{}:{:02}", seconds.div_euclid(60), seconds.rem_euclid(60))
    }
}

/// Cue points without a comment are archived with their timestamp label, which
/// is what djay shows for unnamed cues.
impl Archivable for CuePoint {
    fn encode(&self) -> ArchiveNode {
        let mut node = ArchiveNode::new(Self::CLASS_NAME);
        if self.comment.as_deref().map_or(true, str::is_empty) {
            CuePoint {
                comment: Some(self.timestamp_label()),
                ..self.clone()
            }
            .write_fields(&mut node);
        } else {
            self.write_fields(&mut node);
        }
        node
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MediaItemUserData {
    pub cue_points: Vec<CuePoint>,
    pub end_point: Option<CuePoint>,
    pub energy: f64,
    pub high_eq: f64,
    pub mid_eq: f64,
    pub low_eq: f64,
    pub linked_user_data_uuids: Vec<String>,
    pub loop_regions: Vec<ArchiveValue>,
    pub manual_bpm: f64,
    pub manual_beat_time: f64,
    pub manual_first_down_beat_indices: Vec<ArchiveValue>,
    pub manual_grid_start_points: Vec<ArchiveValue>,
    pub manual_key_signature_index: i64,
    pub play_count: i64,
    pub rating: i64,
    pub start_point: Option<CuePoint>,
    pub tag_uuids: Vec<String>,
    pub uuid: String,
    pub user_changed_cloud_keys: BTreeSet<String>,
}

crate::archived_record!(MediaItemUserData, "ADCMediaItemUserData", {
    cue_points => "cuePoints",
    end_point => "endPoint",
    energy => "energy",
    high_eq => "highEQ",
    mid_eq => "midEQ",
    low_eq => "lowEQ",
    linked_user_data_uuids => "linkedUserDataUUIDs",
    loop_regions => "loopRegions",
    manual_bpm => "manualBPM",
    manual_beat_time => "manualBeatTime",
    manual_first_down_beat_indices => "manualFirstDownBeatIndices",
    manual_grid_start_points => "manualGridStartPoints",
    manual_key_signature_index => "manualKeySignatureIndex",
    play_count => "playCount",
    rating => "rating",
    start_point => "startPoint",
    tag_uuids => "tagUUIDs",
    uuid => "uuid",
    user_changed_cloud_keys => "userChangedCloudKeys",
});

impl Archivable for MediaItemUserData {}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MediaItemAnalyzedData {
    pub bpm: f64,
    pub key_signature_index: i64,
    pub uuid: String,
}

crate::archived_record!(MediaItemAnalyzedData, "ADCMediaItemAnalyzedData", {
    bpm => "bpm",
    key_signature_index => "keySignatureIndex",
    uuid => "uuid",
});

impl Archivable for MediaItemAnalyzedData {}

/// Where the audio file of a media item lives, either on this machine or in
/// a streaming/cloud source.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MediaItemLocation {
    pub source_uris: BTreeSet<Url>,
    pub location_type: i64,
    pub url_bookmark_data: Box<[u8]>,
    pub uuid: String,
}

crate::archived_record!(MediaItemLocation, "ADCMediaItemLocation", {
    source_uris => "sourceURIs",
    location_type => "type",
    url_bookmark_data => "urlBookmarkData",
    uuid => "uuid",
});

impl Archivable for MediaItemLocation {}

/// Installation record of the djay application; its version gates which
/// media libraries can be read.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Product {
    pub use_count: i64,
    pub uuid: String,
    pub first_use_date: f64,
    pub last_use_date: f64,
    pub device_os_version: String,
    pub device_type: String,
    pub version: String,
    pub product_id: String,
}

crate::archived_record!(Product, "ADCProduct", {
    use_count => "useCount",
    uuid => "uuid",
    first_use_date => "firstUseDate",
    last_use_date => "lastUseDate",
    device_os_version => "deviceOSVersion",
    device_type => "deviceType",
    version => "version",
    product_id => "productID",
});

impl Archivable for Product {}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MediaItem {
    pub added_date: f64,
    pub album_artist_uuids: String,
    pub album_disc_count: i64,
    pub album_disc_number: i64,
    pub album_track_count: i64,
    pub album_track_number: i64,
    pub album_type: i64,
    pub album_uuid: String,
    pub bit_rate: i64,
    pub bpm: f64,
    pub channel_count: i64,
    pub comments: String,
    pub composer: String,
    pub content_type: String,
    pub drm_protected: bool,
    pub duration: f64,
    pub explicit_content: bool,
    pub grouping: String,
    pub key_signature_index: i64,
    pub label_uuid: String,
    pub lyrics: String,
    pub modified_date: f64,
    pub origin_source_id: String,
    pub purchased_date: f64,
    pub release_date: f64,
    pub sample_rate: i64,
    pub title: String,
    pub title_id: String,
    pub uuid: String,
    pub year: i64,
    pub artist_uuids: BTreeSet<String>,
    pub genre_uuids: BTreeSet<String>,
}

crate::archived_record!(MediaItem, "ADCMediaItem", {
    added_date => "addedDate",
    album_artist_uuids => "albumArtistUUIDs",
    album_disc_count => "albumDiscCount",
    album_disc_number => "albumDiscNumber",
    album_track_count => "albumTrackCount",
    album_track_number => "albumTrackNumber",
    album_type => "albumType",
    album_uuid => "albumUUID",
    bit_rate => "bitRate",
    bpm => "bpm",
    channel_count => "channelCount",
    comments => "comments",
    composer => "composer",
    content_type => "contentType",
    drm_protected => "drmProtected",
    duration => "duration",
    explicit_content => "explicitContent",
    grouping => "grouping",
    key_signature_index => "keySignatureIndex",
    label_uuid => "labelUUID",
    lyrics => "lyrics",
    modified_date => "modifiedDate",
    origin_source_id => "originSourceID",
    purchased_date => "purchasedDate",
    release_date => "releaseDate",
    sample_rate => "sampleRate",
    title => "title",
    title_id => "titleID",
    uuid => "uuid",
    year => "year",
    artist_uuids => "artistUUIDs",
    genre_uuids => "genreUUIDs",
});

impl Archivable for MediaItem {}

/// Any record a djay media library row can decode to.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    TitleId(MediaItemTitleId),
    CuePoint(CuePoint),
    UserData(MediaItemUserData),
    AnalyzedData(MediaItemAnalyzedData),
    Location(MediaItemLocation),
    MediaItem(MediaItem),
    Product(Product),
    Url(Url),
    MutableData(MutableData),
}

impl Record {
    pub fn class_name(&self) -> &'static str {
        match self {
            Record::TitleId(_) => MediaItemTitleId::CLASS_NAME,
            Record::CuePoint(_) => CuePoint::CLASS_NAME,
            Record::UserData(_) => MediaItemUserData::CLASS_NAME,
            Record::AnalyzedData(_) => MediaItemAnalyzedData::CLASS_NAME,
            Record::Location(_) => MediaItemLocation::CLASS_NAME,
            Record::MediaItem(_) => MediaItem::CLASS_NAME,
            Record::Product(_) => Product::CLASS_NAME,
            Record::Url(_) => Url::CLASS_NAME,
            Record::MutableData(_) => MutableData::CLASS_NAME,
        }
    }
}

macro_rules! record_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Record {
                fn from(record: $ty) -> Self {
                    Record::$variant(record)
                }
            }
        )*
    };
}

record_from!(
    TitleId(MediaItemTitleId),
    CuePoint(CuePoint),
    UserData(MediaItemUserData),
    AnalyzedData(MediaItemAnalyzedData),
    Location(MediaItemLocation),
    MediaItem(MediaItem),
    Product(Product),
    Url(Url),
    MutableData(MutableData),
);

impl ClassRegistry<Record> {
    /// Every class found in a djay Pro 2 media library.
    pub fn djay() -> Self {
        ClassRegistry::builder()
            .register::<CuePoint>()
            .register::<MediaItem>()
            .register::<MediaItemAnalyzedData>()
            .register::<MediaItemLocation>()
            .register::<MediaItemTitleId>()
            .register::<MediaItemUserData>()
            .register::<MutableData>()
            .register::<Url>()
            .register::<Product>()
            .build()
    }
}

impl Archiver<Record> {
    pub fn djay<C: ObjectGraphCodec + 'static>(codec: C) -> Self {
        Archiver::new(ClassRegistry::djay(), codec)
    }
}

/// A track as djay sees it: the fragments stored under one media item key,
/// one per collection.
///
/// `title` is mandatory in a well-formed library but kept optional here so
/// that a missing title row is visible to callers.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DjayTrack {
    pub title: Option<MediaItemTitleId>,
    pub user_data: Option<MediaItemUserData>,
    pub local_location: Option<MediaItemLocation>,
    pub global_location: Option<MediaItemLocation>,
    pub analysis: Option<MediaItemAnalyzedData>,
    pub media_item: Option<MediaItem>,
}

impl DjayTrack {
    pub fn uuid(&self) -> Option<&str> {
        self.title.as_ref().map(|title| title.uuid.as_str())
    }
}
