//! Remove known clips from a recording
//!
//! Usage:
//!   remove_clips [options] <recording> -u <clip> [-u <clip> ...]
//!
//! Writes `<out>/trimmed/<stem>.wav` tagged like the recording,
//! `<out>/discard/<stem>.wav` and a log of the run to `<out>/trimmed/<stem>.txt`.

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use stratum_clipcut::editing::report::RemovalSummary;
use stratum_clipcut::io::decoder::decode_audio;
use stratum_clipcut::io::tags::copy_tags;
use stratum_clipcut::io::writer::write_wav;
use stratum_clipcut::{LogSink, Recording, ReferenceClip, RemovalConfig};

const USAGE: &str = "Usage: remove_clips [options] <recording> -u <clip> [-u <clip> ...]\n\
                     \n\
                     -u, --unwanted FILE   Reference clip to remove (repeatable)\n\
                     --chunk-minutes N     Correlation window length in minutes (default: 30)\n\
                     --threshold T         Match threshold for every clip (default: 1.0)\n\
                     --dry-run             Print detected ranges, write nothing\n\
                     --json                Print the run summary as JSON\n\
                     --no-discard          Do not write the removed audio\n\
                     --no-tags             Do not copy the recording's tags\n\
                     --out-dir DIR         Output root (default: current directory)\n";

/// Milestones go to the log facade and, when open, the run's log file
struct TeeSink {
    file: Option<Mutex<File>>,
}

impl LogSink for TeeSink {
    fn log(&self, message: &str) {
        log::info!("{}", message);
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                if let Err(e) = writeln!(file, "{}", message) {
                    log::warn!("Failed to write log file: {}", e);
                }
            }
        }
    }
}

struct Options {
    recording: PathBuf,
    clips: Vec<PathBuf>,
    config: RemovalConfig,
    dry_run: bool,
    json: bool,
    capture_discard: bool,
    copy_tags: bool,
    out_dir: PathBuf,
}

fn next_value<T: std::str::FromStr>(
    args: &mut Vec<String>,
    flag: &str,
) -> Result<T, Box<dyn std::error::Error>>
where
    T::Err: std::error::Error + 'static,
{
    if args.is_empty() {
        return Err(format!("{} requires a value", flag).into());
    }
    Ok(args.remove(0).parse::<T>()?)
}

/// `Ok(None)` means help was printed
fn parse_args(mut args: Vec<String>) -> Result<Option<Options>, Box<dyn std::error::Error>> {
    let mut recording: Option<PathBuf> = None;
    let mut clips = Vec::new();
    let mut config = RemovalConfig::default();
    let mut dry_run = false;
    let mut json = false;
    let mut capture_discard = true;
    let mut copy_tags = true;
    let mut out_dir = PathBuf::from(".");

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "-u" | "--unwanted" => clips.push(next_value::<PathBuf>(&mut args, &a)?),
            "--chunk-minutes" => config.chunk_minutes = next_value(&mut args, &a)?,
            "--threshold" => config.match_threshold = next_value(&mut args, &a)?,
            "--dry-run" => dry_run = true,
            "--json" => json = true,
            "--no-discard" => capture_discard = false,
            "--no-tags" => copy_tags = false,
            "--out-dir" => out_dir = next_value::<PathBuf>(&mut args, &a)?,
            "--help" | "-h" => {
                eprintln!("{}", USAGE);
                return Ok(None);
            }
            _ if a.starts_with('-') => return Err(format!("Unknown option: {}", a).into()),
            _ => {
                if recording.is_some() {
                    return Err(format!("Unexpected argument: {}", a).into());
                }
                recording = Some(PathBuf::from(a));
            }
        }
    }

    let recording = recording.ok_or("Provide a recording path")?;
    if clips.is_empty() {
        return Err("Provide at least one reference clip with -u".into());
    }

    Ok(Some(Options {
        recording,
        clips,
        config,
        dry_run,
        json,
        capture_discard,
        copy_tags,
        out_dir,
    }))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let opts = match parse_args(env::args().skip(1).collect()) {
        Ok(Some(opts)) => opts,
        Ok(None) => return Ok(()),
        Err(e) => {
            eprintln!("ERROR: {}. Use --help for usage.", e);
            std::process::exit(2);
        }
    };

    let t0 = Instant::now();
    let stem = file_stem(&opts.recording);
    let trimmed_dir = opts.out_dir.join("trimmed");
    let discard_dir = opts.out_dir.join("discard");

    let log_file = if opts.dry_run {
        None
    } else {
        fs::create_dir_all(&trimmed_dir)?;
        Some(Mutex::new(File::create(trimmed_dir.join(format!("{}.txt", stem)))?))
    };
    let sink: Arc<dyn LogSink> = Arc::new(TeeSink { file: log_file });

    sink.log(&format!("Loading {}", opts.recording.display()));
    let waveform = decode_audio(&opts.recording)?.into_waveform()?;
    let sample_rate = waveform.sample_rate();
    let original_duration_seconds = waveform.duration_seconds() as f64;

    let mut clips = Vec::with_capacity(opts.clips.len());
    for path in &opts.clips {
        sink.log(&format!("Loading unwanted clip {}", path.display()));
        let clip_waveform = decode_audio(path)?.into_waveform()?;
        clips.push(ReferenceClip::from_config(
            file_stem(path),
            clip_waveform,
            &opts.config,
        )?);
    }

    let mut recording =
        Recording::new(waveform, opts.config.clone())?.with_shared_sink(Arc::clone(&sink));
    for clip in clips {
        recording.register_reference_clip(clip)?;
    }

    let detection = recording.detect_unwanted_ranges()?;
    let ranges = recording.range_report();

    if opts.dry_run {
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&ranges)?);
        } else {
            for r in &ranges {
                println!("{:.3}s - {:.3}s", r.start_seconds, r.end_seconds);
            }
        }
        eprintln!(
            "Dry run: {} range(s) found in {:.2} s",
            ranges.len(),
            t0.elapsed().as_secs_f32()
        );
        return Ok(());
    }

    let removal = recording.remove_detected_ranges(opts.capture_discard);
    let (trimmed, discard) = recording.into_parts();

    let trimmed_path = trimmed_dir.join(format!("{}.wav", stem));
    write_wav(&trimmed_path, &trimmed)?;
    sink.log(&format!("Wrote {}", trimmed_path.display()));

    if opts.copy_tags {
        // Untaggable sources (raw formats lofty cannot read) still get their audio
        if let Err(e) = copy_tags(&opts.recording, &trimmed_path, Some(sink.as_ref())) {
            log::warn!("{}", e);
            sink.log(&format!("Tags not copied: {}", e));
        }
    }

    if !opts.capture_discard {
        sink.log("Discard capture disabled, so not saving.");
    } else if discard.is_empty() {
        sink.log("No discarded audio present, so not saving.");
    } else {
        fs::create_dir_all(&discard_dir)?;
        let discard_path = discard_dir.join(format!("{}.wav", stem));
        write_wav(&discard_path, &discard)?;
        sink.log(&format!("Wrote {}", discard_path.display()));
    }

    let summary = RemovalSummary {
        sample_rate,
        original_duration_seconds,
        trimmed_duration_seconds: trimmed.duration_seconds() as f64,
        discard_duration_seconds: discard.duration_seconds() as f64,
        ranges,
        detection,
        processing_time_ms: t0.elapsed().as_secs_f32() * 1000.0,
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Removed {} range(s), {:.2} s of {:.2} s",
            removal.ranges_removed,
            original_duration_seconds - summary.trimmed_duration_seconds,
            original_duration_seconds
        );
        for r in &summary.ranges {
            println!("  {:.3}s - {:.3}s", r.start_seconds, r.end_seconds);
        }
    }

    Ok(())
}
