//! sailtrack CLI - Segment sailing GPS tracks and classify maneuvers
//!
//! Usage:
//!   sailtrack-cli [OPTIONS] <FILES>...
//!
//! Reads all GPX files given on the command line, pulls out their track
//! segments, drops duplicate and very short segments, and reassembles the
//! rest into tracks of segments no more than an hour apart. With an activity
//! (`-a sail`) each track is split into moving, turning and static segments;
//! with a wind direction (`--wind NE`, or `--wind UNK` to infer it) the
//! segments are also classified by point of sail and turn type.

use clap::Parser;
use sailtrack::{
    Activity, AnalysisParameters, Track, TrackSource, WindDirection, build_tracks,
    dedupe_segments, gpx_io, sort_segments, split_segments,
};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Segments further apart than this belong to different tracks.
const TRACK_GAP_SECONDS: i64 = 3600;

#[derive(Parser)]
#[command(name = "sailtrack-cli")]
#[command(about = "Segment sailing GPS tracks and classify maneuvers", long_about = None)]
struct Cli {
    /// GPX files to read
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Analyze tracks using this activity type (e.g. "sail")
    #[arg(short, long)]
    activity: Option<String>,

    /// Wind direction for point of sail analysis, e.g. NE or SSW, or UNK to
    /// deduce it from the track. Implies `-a sail`.
    #[arg(short, long)]
    wind: Option<String>,

    /// Discard segments with no more than this number of points
    #[arg(long, default_value = "20")]
    min_points: usize,

    /// Print every segment of every track
    #[arg(short, long)]
    verbose: bool,

    /// Print analyzed tracks as JSON
    #[arg(long)]
    json: bool,

    /// Directory to write one JSON file per analyzed track
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Fail on bad flags before touching any file
    let wind = cli
        .wind
        .as_deref()
        .map(WindDirection::parse_or_unknown)
        .transpose()?;
    let activity = match (&cli.activity, wind) {
        (Some(name), _) => Some(name.parse::<Activity>()?),
        (None, Some(_)) => Some(Activity::Sailing),
        (None, None) => None,
    };

    let sources = load_tracks(&cli.files, cli.min_points)?;

    let Some(activity) = activity else {
        for source in &sources {
            print_source(source);
        }
        return Ok(());
    };
    let params = activity.parameters();

    #[cfg(feature = "parallel")]
    let tracks = sailtrack::analyze_tracks_parallel(&sources, &params)?;
    #[cfg(not(feature = "parallel"))]
    let tracks = sailtrack::analyze_tracks(&sources, &params)?;

    if let Some(dir) = &cli.output {
        fs::create_dir_all(dir)?;
    }

    let mut classified = Vec::with_capacity(tracks.len());
    for mut track in tracks {
        if let Some(setting) = wind {
            classify(&mut track, setting);
        }
        if !cli.json {
            print_track(&track, &params, cli.verbose);
        }
        if let Some(dir) = &cli.output {
            write_track_json(&track, dir)?;
        }
        classified.push(track);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&classified)?);
    }
    Ok(())
}

/// Read, clean up and regroup the segments of all files.
fn load_tracks(files: &[PathBuf], min_points: usize) -> Result<Vec<TrackSource>, Box<dyn std::error::Error>> {
    let mut segments = Vec::new();
    for path in files {
        segments.extend(gpx_io::read_file(path)?);
    }
    let read = segments.len();
    let gap = chrono::Duration::seconds(TRACK_GAP_SECONDS);

    sort_segments(&mut segments);
    let segments = dedupe_segments(segments, min_points);
    let segments = split_segments(segments, gap);
    let segments = dedupe_segments(segments, min_points);
    println!(
        "Dropped {} duplicate and short segments",
        read.saturating_sub(segments.len())
    );

    Ok(build_tracks(segments, gap))
}

/// Classify with the given wind, inferring it first when unknown.
fn classify(track: &mut Track, setting: Option<WindDirection>) {
    match setting.or_else(|| track.infer_wind(None)) {
        Some(wind) => track.classify(wind),
        None => log::warn!(
            "[Wind] {}: could not determine wind direction, skipping point of sail analysis",
            track
        ),
    }
}

fn print_source(source: &TrackSource) {
    let start = source.segments.first().and_then(|s| s.start());
    let end = source.segments.last().and_then(|s| s.end());
    match (start, end) {
        (Some(start), Some(end)) => println!(
            "{} {} ({} segments, {} points) {}",
            start.format("%y-%m-%d %H:%M:%S"),
            sailtrack::track::format_duration(end - start),
            source.segments.len(),
            source.fix_count(),
            source.name
        ),
        _ => println!("{} (empty)", source.name),
    }
}

fn print_track(track: &Track, params: &AnalysisParameters, verbose: bool) {
    println!("{}", track);
    if !verbose {
        return;
    }
    for (i, segment) in track.segments.iter().enumerate() {
        match &segment.segment_type {
            Some(kind) => println!("{}: {} {}", i, kind, segment.describe(params)),
            None => println!("{}: {}", i, segment.describe(params)),
        }
    }
}

fn write_track_json(track: &Track, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let path = dir.join(format!("{}.json", track.file_name()));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, track)?;
    writer.flush()?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
