mod file_config;

pub use file_config::FileConfig;

use crate::djay::default_media_library_path;
use crate::rekordbox::default_xml_path;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub media_library_db: Option<PathBuf>,
    pub rekordbox_xml: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub media_library_db: PathBuf,
    pub rekordbox_xml: PathBuf,
    pub dry_run: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present, CLI values override the
    /// default install locations.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let media_library_db = file
            .media_library_db
            .map(PathBuf::from)
            .or_else(|| cli.media_library_db.clone())
            .or_else(default_media_library_path)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "media_library_db must be specified via --media-library or in config file"
                )
            })?;

        if !media_library_db.exists() {
            bail!("Media library does not exist: {:?}", media_library_db);
        }
        if !media_library_db.is_file() {
            bail!("media_library_db is not a file: {:?}", media_library_db);
        }

        // Only read by the commands that need it, so not checked here.
        let rekordbox_xml = file
            .rekordbox_xml
            .map(PathBuf::from)
            .or_else(|| cli.rekordbox_xml.clone())
            .or_else(default_xml_path)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "rekordbox_xml must be specified via --rekordbox-xml or in config file"
                )
            })?;

        let dry_run = file.dry_run.unwrap_or(cli.dry_run);

        Ok(Self {
            media_library_db,
            rekordbox_xml,
            dry_run,
        })
    }
}
