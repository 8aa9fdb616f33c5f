//! Command-line tool packing files into a tar archive.
//!
//! Files are read from disk, appended with their permission bits and
//! modification time, and the finalized archive is written out, optionally
//! gzip-compressed.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example pack -- notes.txt src/lib.rs -o bundle.tar
//! cargo run --example pack -- notes.txt -o bundle.tar.gz --gzip
//! ```
//!
//! Archive settings can be loaded from YAML:
//!
//! ```sh
//! cargo run --example pack -- *.txt -o out.tar --config archive.yaml
//! ```
//!
//! Set `RUST_LOG=ustar_builder=debug` to see every append.

use clap::Parser;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ustar_builder::{ArchiveBuilder, ArchiveConfig, EntryOptions};

/// Pack files into a tar archive
#[derive(Parser, Debug)]
#[command(name = "pack", about = "Pack files into a tar archive", version)]
struct Args {
    /// Files to pack, stored under the paths given
    #[arg(value_name = "FILE", required = true)]
    input: Vec<PathBuf>,

    /// Output archive
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Compress the archive with gzip
    #[arg(long)]
    gzip: bool,

    /// YAML archive settings (records_per_block, max_archive_size)
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Owner user name recorded for every entry
    #[arg(long, default_value = "")]
    owner: String,

    /// Owner group name recorded for every entry
    #[arg(long, default_value = "")]
    group: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ArchiveConfig::from_yaml_str(&fs::read_to_string(path)?)?,
        None => ArchiveConfig::default(),
    };
    let mut builder = ArchiveBuilder::with_config(config)?;

    let total = args.input.len();
    for (i, path) in args.input.iter().enumerate() {
        let content = fs::read(path)?;
        let options = entry_options(path, &args)?;
        let name = archive_name(path);

        builder.append(name.as_bytes(), &content, &options)?;
        info!(
            file = %name,
            size = content.len(),
            progress = format!("{}/{}", i + 1, total),
            "packed"
        );
    }

    let archive = builder.into_bytes()?;

    if args.gzip {
        let mut encoder = GzEncoder::new(fs::File::create(&args.output)?, Compression::default());
        encoder.write_all(&archive)?;
        encoder.finish()?;
    } else {
        fs::write(&args.output, &archive)?;
    }

    info!(
        output = %args.output.display(),
        entries = total,
        length = archive.len(),
        gzip = args.gzip,
        "archive written"
    );
    Ok(())
}

/// Header metadata taken from the file on disk
fn entry_options(path: &Path, args: &Args) -> std::io::Result<EntryOptions> {
    let metadata = fs::metadata(path)?;
    let mut options = EntryOptions::new()
        .with_owner(args.owner.clone())
        .with_group(args.group.clone());

    if let Some(since_epoch) = metadata
        .modified()
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
    {
        options = options.with_mtime(since_epoch.as_secs());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options = options.with_mode(metadata.permissions().mode());
    }

    Ok(options)
}

/// Relative, forward-slash path for the name field
fn archive_name(path: &Path) -> String {
    let name = path.to_string_lossy().replace('\\', "/");
    name.trim_start_matches('/').to_string()
}
