//! Layout of the djay Pro 2 media library database.
//!
//! djay stores every record in one key-value table, `database2`, partitioned
//! by collection name. Rows of different collections sharing a key belong to
//! the same media item.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table};

pub const DATABASE2_TABLE: Table = Table {
    name: "database2",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("collection", &SqlType::Text, non_null = true),
        sqlite_column!("key", &SqlType::Text, non_null = true),
        sqlite_column!("data", &SqlType::Blob),
        sqlite_column!("metadata", &SqlType::Blob),
    ],
};

pub(crate) const SELECT_ALL_ROWS: &str = "SELECT rowid, collection, key, data, metadata FROM database2";

pub(crate) const UPDATE_ROW_DATA: &str =
    "UPDATE database2 SET data = ?1 WHERE collection = ?2 AND key = ?3";

// =============================================================================
// Collections
// =============================================================================

pub const MEDIA_ITEM_TITLE_IDS: &str = "mediaItemTitleIDs";
pub const MEDIA_ITEM_USER_DATA: &str = "mediaItemUserData";
pub const MEDIA_ITEM_ANALYZED_DATA: &str = "mediaItemAnalyzedData";
pub const LOCAL_MEDIA_ITEM_LOCATIONS: &str = "localMediaItemLocations";
pub const GLOBAL_MEDIA_ITEM_LOCATIONS: &str = "globalMediaItemLocations";
pub const MEDIA_ITEMS: &str = "mediaItems";
pub const PRODUCTS: &str = "products";

/// Collections whose rows are fragments of a track.
pub const TRACK_COLLECTIONS: &[&str] = &[
    MEDIA_ITEM_USER_DATA,
    MEDIA_ITEM_TITLE_IDS,
    MEDIA_ITEM_ANALYZED_DATA,
    LOCAL_MEDIA_ITEM_LOCATIONS,
    GLOBAL_MEDIA_ITEM_LOCATIONS,
    MEDIA_ITEMS,
];

// =============================================================================
// Compatibility
// =============================================================================

/// Key of the `products` row describing the djay installation.
pub const PRODUCT_KEY: &str = "com.algoriddim.direct.djay-pro-2-mac-Mac";

/// The only djay version whose media library layout is understood.
pub const SUPPORTED_VERSION: &str = "2.0.8";

pub fn is_supported_version(version: &str) -> bool {
    version == SUPPORTED_VERSION
}
