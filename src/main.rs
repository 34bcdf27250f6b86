use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use anim3d::frames::FrameSource;
use anim3d::reader::AnimationFile;
use anim3d::{convert, Summary, DATA_DIR, FRAME_PREFIX, MATERIAL_FILE, OUTPUT_FILE};

/// Converts a range of OBJ animation frames into one `.3d` file.
#[derive(Parser, Debug)]
#[command(name = "anim3d")]
#[command(version)]
struct Args {
    /// First frame number, inclusive
    start: u32,

    /// Last frame number, inclusive
    end: u32,

    /// Directory holding the frame and material files
    #[arg(long, value_name = "DIR", default_value = DATA_DIR)]
    data_dir: PathBuf,

    /// File name prefix of every frame, followed by the frame number
    #[arg(long, default_value = FRAME_PREFIX)]
    prefix: String,

    /// Material file name inside the data directory
    #[arg(long, value_name = "FILE", default_value = MATERIAL_FILE)]
    material: String,

    /// Output path [default: <DATA_DIR>/out.3d]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Read the written file back and check its counts
    #[arg(long)]
    verify: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let source = FrameSource::new(&args.data_dir)
        .with_prefix(&args.prefix)
        .with_material(&args.material);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.data_dir.join(OUTPUT_FILE));

    let summary = convert(&source, args.start, args.end, &output)
        .with_context(|| format!("Failed to convert frames {}..={}", args.start, args.end))?;

    info!(
        groups = summary.groups,
        vertices = summary.vertices,
        triangles = summary.triangles,
        frames = summary.frames,
        output = %output.display(),
        "conversion finished"
    );

    if args.verify {
        verify(&output, &summary)?;
    }

    return Ok(());
}

fn verify(output: &Path, summary: &Summary) -> Result<()> {
    let file = AnimationFile::read(output)
        .with_context(|| format!("Failed to read back {}", output.display()))?;

    let found = Summary::of_file(&file);

    if !summary.agrees_with(&found) {
        anyhow::bail!("Verification failed: wrote {:?}, read back {:?}", summary, found);
    }

    info!(path = %output.display(), "verified output");

    return Ok(());
}
