//! atomrec - Recover unsaved Atom editor notes from IndexedDB
//!
//! This tool scans the raw LevelDB files behind Atom's IndexedDB store for
//! unsaved buffer records and exports each recovered note as a standalone
//! file with a grammar-appropriate extension.

use anyhow::{Context, Result};
use atomrec_core::scanner::grammar;
use atomrec_core::{grammars, is_internal_buffer, Error, Extractor, RecoveredBuffers};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Recover unsaved notes from Atom editor's IndexedDB
#[derive(Parser, Debug)]
#[command(name = "atomrec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to Atom's IndexedDB directory
    /// (e.g., ~/Library/Application Support/Atom/IndexedDB/file__0.indexeddb.leveldb)
    #[arg(long)]
    atom_db_dir: PathBuf,

    /// Output directory for exported notes
    #[arg(long)]
    out_dir: PathBuf,

    /// Extension for notes without a detected grammar
    #[arg(long, default_value = "txt")]
    force_ext: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Validated run configuration, built once before any extraction starts
#[derive(Debug, Clone)]
struct ExportConfig {
    atom_db_dir: PathBuf,
    out_dir: PathBuf,
    force_ext: String,
}

impl ExportConfig {
    /// Validates the CLI arguments into a usable configuration.
    ///
    /// The database directory must exist and be a directory; the fallback
    /// extension is normalized (whitespace and leading dots stripped) and
    /// checked against the supported extension set.
    fn new(atom_db_dir: PathBuf, out_dir: PathBuf, force_ext: &str) -> atomrec_core::Result<Self> {
        if !atom_db_dir.exists() {
            return Err(Error::db_dir_missing(atom_db_dir));
        }
        if !atom_db_dir.is_dir() {
            return Err(Error::db_dir_not_directory(atom_db_dir));
        }

        let clean_ext = force_ext.trim().trim_start_matches('.').to_string();
        let supported = grammars::supported_extensions();
        if !supported.contains(clean_ext.as_str()) {
            return Err(Error::unsupported_extension(force_ext, supported));
        }

        Ok(Self {
            atom_db_dir,
            out_dir,
            force_ext: clean_ext,
        })
    }
}

/// Counters reported at the end of a run
#[derive(Debug, Default, PartialEq, Eq)]
struct ExportStats {
    files_scanned: usize,
    buffers_found: usize,
    internal_skipped: usize,
    exported: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let config = ExportConfig::new(cli.atom_db_dir, cli.out_dir, &cli.force_ext)?;
    let stats = run(&config)?;

    debug!(?stats, "run complete");
    Ok(())
}

/// Scans the store and exports every recovered user note.
///
/// Per-file read failures are skipped with a warning; configuration and
/// output I/O failures abort the run.
fn run(config: &ExportConfig) -> Result<ExportStats> {
    let files = collect_storage_files(&config.atom_db_dir);
    if files.is_empty() {
        return Err(Error::no_storage_files(&config.atom_db_dir).into());
    }

    let extractor = Extractor::new();
    let mut recovered = RecoveredBuffers::new();
    let mut stats = ExportStats::default();

    for path in &files {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };

        debug!("scanning {} ({} bytes)", path.display(), data.len());
        recovered.merge_file(extractor.extract_texts(&data), grammar::extract_grammars(&data));
        stats.files_scanned += 1;
    }

    stats.buffers_found = recovered.buffer_count();
    println!("Found {} unique buffer(s)", recovered.buffer_count());
    if recovered.grammar_count() > 0 {
        println!(
            "Found {} buffer(s) with explicit grammar/syntax",
            recovered.grammar_count()
        );
    }

    let timestamp_dir = config.out_dir.join(timestamp());
    fs::create_dir_all(&timestamp_dir).map_err(|e| Error::directory_create(&timestamp_dir, e))?;

    export_notes(config, &recovered, &timestamp_dir, &mut stats)?;

    println!(
        "Extracted {} unsaved note(s) into: {}",
        stats.exported,
        timestamp_dir.display()
    );
    Ok(stats)
}

/// Writes one file per recovered user buffer into `timestamp_dir`
fn export_notes(
    config: &ExportConfig,
    recovered: &RecoveredBuffers,
    timestamp_dir: &Path,
    stats: &mut ExportStats,
) -> Result<()> {
    for record in recovered.records() {
        if is_internal_buffer(&record.text) {
            info!(
                "skipping internal buffer: {}...",
                &record.id[..16.min(record.id.len())]
            );
            stats.internal_skipped += 1;
            continue;
        }

        let ext = record
            .grammar
            .as_deref()
            .and_then(grammars::extension_for)
            .unwrap_or(&config.force_ext);

        let slug = slugify(first_line(&record.text));
        let filename = format!("{}__{:03}.{}", slug, stats.exported, ext);
        println!("  {} [{}]", display_name(&filename), ext);

        let out_path = timestamp_dir.join(&filename);
        fs::write(&out_path, &record.text)
            .map_err(|e| Error::file_write(&out_path, e))
            .with_context(|| format!("aborting export after {} note(s)", stats.exported))?;

        stats.exported += 1;
    }

    Ok(())
}

/// Collect the LevelDB storage files from the database directory,
/// most recently modified first
fn collect_storage_files(db_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<(PathBuf, SystemTime)> = WalkDir::new(db_dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            matches!(
                e.path().extension().and_then(|ext| ext.to_str()),
                Some("ldb") | Some("log")
            )
        })
        .map(|e| {
            let mtime = e
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (e.into_path(), mtime)
        })
        .collect();

    files.sort_by(|a, b| b.1.cmp(&a.1));
    files.into_iter().map(|(path, _)| path).collect()
}

/// Local-time name for the per-run export subdirectory
fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// First line of the note, used as the filename seed
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

/// Turns a note's first line into a filesystem-safe slug.
///
/// Runs of non-alphanumeric characters collapse to a single hyphen, the
/// result is lowercased and capped at 60 characters, and symbol-only or
/// empty lines fall back to `note`.
fn slugify(line: &str) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;

    for c in line.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > 60 {
        slug.truncate(60);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        slug = "note".to_string();
    }
    slug
}

/// Truncate long filenames for console output
fn display_name(filename: &str) -> String {
    let base = filename.rsplit_once('.').map_or(filename, |(base, _)| base);
    if base.len() > 50 {
        format!("{}...", &base[..47])
    } else {
        base.to_string()
    }
}
