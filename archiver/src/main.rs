mod cleanup;
mod cli;
mod walk;

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use cli::{CliError, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let args = cli::parse_args()?;
    args.command.validate()?;

    match args.command {
        Commands::Compress {
            paths,
            block,
            r#type: _,
            dest,
            quiet,
        } => run_compress(paths, block, dest, quiet),
        Commands::Decompress {
            archive,
            dest,
            quiet,
        } => run_decompress(archive, dest, quiet),
        Commands::Metadata { archive } => run_metadata(archive),
    }
}

fn run_compress(
    paths: Vec<PathBuf>,
    block: Option<usize>,
    dest: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let mut inputs = Vec::new();
    for path in &paths {
        inputs.extend(walk::collect_files(path)?);
    }

    let dest_dir = dest.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dest_dir)?;
    let dest = unique_path(dest_dir.join(archive_file_name(&paths)));
    let _ = cleanup::install(dest.clone());

    let (progress, rx) = container::Progress::new(64);
    let printer = spawn_progress_printer(rx, quiet);

    let result = container::compress_files(&inputs, &dest, block, &progress);
    printer.join().ok();
    result?;

    println!("wrote {}", dest.display());
    Ok(())
}

fn run_decompress(archive: PathBuf, dest: Option<PathBuf>, quiet: bool) -> Result<(), CliError> {
    let dest_dir = unique_path(dest.unwrap_or_else(|| default_decompress_dir(&archive)));
    std::fs::create_dir_all(&dest_dir)?;

    let (progress, rx) = container::Progress::new(64);
    let printer = spawn_progress_printer(rx, quiet);

    let result = container::decompress_archive(&archive, &dest_dir, &progress);
    printer.join().ok();
    let written = result?;

    for path in written {
        println!("restored {}", path.display());
    }
    Ok(())
}

fn run_metadata(archive: PathBuf) -> Result<(), CliError> {
    let metadata = container::read_metadata(&archive)?;
    let mut files = metadata.files;
    files.sort_by(|a, b| a.path.cmp(&b.path));

    println!("{:<40} {:>12} {}", "File", "Size", "Checksum");
    for f in files {
        println!("{:<40} {:>12} {}", f.path, f.size, f.checksum);
    }
    Ok(())
}

fn spawn_progress_printer(rx: Receiver<u64>, quiet: bool) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for bytes in rx {
            if !quiet {
                println!("progress: {bytes} bytes");
            }
        }
    })
}

/// The archive's file name is always derived from the first input path's
/// basename, regardless of how many inputs are given.
fn archive_file_name(paths: &[PathBuf]) -> PathBuf {
    let stem = paths[0]
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    PathBuf::from(stem).with_extension(cli::OUTPUT_EXT)
}

/// Decompressing with no `--dest` extracts next to the archive, in a
/// directory named after its stem.
fn default_decompress_dir(archive: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    archive.parent().unwrap_or(Path::new(".")).join(stem)
}

/// Appends " (k)" before the extension until the path is free, matching
/// `getUniqueName` in the source this was distilled from.
fn unique_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    let ext = path.extension().map(|s| s.to_string_lossy().into_owned());
    let parent = path.parent().map(PathBuf::from).unwrap_or_default();

    let mut k = 1u32;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem} ({k}).{ext}"),
            None => format!("{stem} ({k})"),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        k += 1;
    }
}
