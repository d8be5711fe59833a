use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use djtools::archive::{Archiver, JsonGraphCodec};
use djtools::config::{AppConfig, CliConfig, FileConfig};
use djtools::djay::{DjayTrack, Explorer, MediaItemTitleId, TrackQuery};
use djtools::{find_matching_track, rekordbox, transfer_cue_points};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::get_styles;

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "djtools", styles = get_styles())]
#[command(about = "Explore the djay Pro 2 media library and import Rekordbox cue points")]
struct CliArgs {
    /// Path to a TOML config file. Its values override command line options.
    #[arg(long, global = true, value_parser = parse_path)]
    config: Option<PathBuf>,

    /// Path to the djay Pro 2 MediaLibrary.db file.
    ///
    /// Rows are decoded with the JSON object graph codec; a library written
    /// by djay itself needs a keyed-archive codec behind `ObjectGraphCodec`.
    #[arg(long, global = true, value_parser = parse_path)]
    media_library: Option<PathBuf>,

    /// Path to the Rekordbox collection XML export.
    #[arg(long, global = true, value_parser = parse_path)]
    rekordbox_xml: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists the title of every track in the media library.
    ListTracks,

    /// Shows every stored fragment of a track.
    ShowTrack { id: String },

    /// Shows the single track matching all the given filters.
    FindTrack {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Length in seconds, matched to within 0.01s.
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Replaces the cue points of every djay track with those of the
    /// matching Rekordbox track.
    TransferCues {
        /// Print the cue points that would be written instead of saving them.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct CuePointPreview<'a> {
    rekordbox_track_id: i64,
    title: &'a MediaItemTitleId,
    cue_points: &'a [djtools::djay::CuePoint],
}

fn transfer_cues(explorer: &mut Explorer, config: &AppConfig) -> Result<()> {
    info!("Reading Rekordbox collection {:?}...", config.rekordbox_xml);
    let rekordbox_tracks = rekordbox::parse_xml_file(&config.rekordbox_xml)
        .with_context(|| format!("Failed to read {:?}", config.rekordbox_xml))?;

    let djay_tracks = explorer.get_all_tracks()?;
    info!(
        "Matching {} djay tracks against {} Rekordbox tracks",
        djay_tracks.len(),
        rekordbox_tracks.len()
    );

    let mut unmatched = 0usize;
    let mut without_cues = 0usize;
    let mut transferred = 0usize;
    for track in &djay_tracks {
        let Some(title) = &track.title else {
            warn!("Skipping track without title: {:?}", track);
            continue;
        };
        let Some(source) = find_matching_track(track, &rekordbox_tracks) else {
            debug!("No Rekordbox match for {:?}", title.string_representation);
            unmatched += 1;
            continue;
        };
        if source.cue_points.is_empty() {
            without_cues += 1;
            continue;
        }

        let updated: DjayTrack = transfer_cue_points(source, track);
        if config.dry_run {
            print_json(&CuePointPreview {
                rekordbox_track_id: source.track_id,
                title,
                cue_points: updated
                    .user_data
                    .as_ref()
                    .map(|user_data| user_data.cue_points.as_slice())
                    .unwrap_or_default(),
            })?;
        } else {
            explorer.save_track(&updated)?;
        }
        transferred += 1;
    }

    info!(
        "{} {} tracks, {} matched without cue points, {} unmatched",
        if config.dry_run { "Would update" } else { "Updated" },
        transferred,
        without_cues,
        unmatched
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        media_library_db: cli_args.media_library,
        rekordbox_xml: cli_args.rekordbox_xml,
        dry_run: matches!(cli_args.command, Command::TransferCues { dry_run: true }),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening media library {:?}...", config.media_library_db);
    let mut explorer = Explorer::open(&config.media_library_db, Archiver::djay(JsonGraphCodec))?;
    debug!("Media library {:?} ready", explorer.db_path());

    match cli_args.command {
        Command::ListTracks => {
            let tracks = explorer.get_all_tracks()?;
            let titles: Vec<_> = tracks.iter().filter_map(|t| t.title.as_ref()).collect();
            print_json(&titles)
        }
        Command::ShowTrack { id } => print_json(&explorer.load_track(&id)?),
        Command::FindTrack {
            id,
            artist,
            title,
            duration,
        } => {
            let query = TrackQuery {
                id,
                artist,
                title,
                duration,
            };
            print_json(&explorer.find_track(&query)?)
        }
        Command::TransferCues { .. } => transfer_cues(&mut explorer, &config),
    }
}
