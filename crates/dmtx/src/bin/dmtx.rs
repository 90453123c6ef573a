//! Command-line front end: decode a Data Matrix symbol from an image
//! file and print the payload.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dmtx::{decode_image, DecodeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "dmtx",
    version,
    about = "Decode an ECC 200 Data Matrix barcode from an image file"
)]
struct Args {
    /// Path to the image containing the symbol.
    image: PathBuf,

    /// Render the payload through its GS1/HIBC human-readable form
    /// instead of the raw decoded text.
    #[arg(long)]
    human_readable: bool,

    /// Render a GS1 Digital Link URL for this host prefix, when the
    /// payload is GS1-formatted.
    #[arg(long, value_name = "URL_PREFIX")]
    gs1_url_prefix: Option<String>,

    /// Compute and print the ISO/IEC 15415 print-quality grade.
    #[arg(long)]
    quality: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = dmtx::logger::init_with_level(level);

    let config = DecodeConfig {
        human_readable: args.human_readable,
        gs1_url_prefix: args.gs1_url_prefix,
        include_quality: args.quality,
        ..DecodeConfig::default()
    };

    let output = match decode_image(&args.image, &config) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let Some(grid) = &output.grid else {
        eprintln!("no Data Matrix symbol found in {}", args.image.display());
        return ExitCode::FAILURE;
    };

    println!("{}", output.text);
    eprintln!(
        "symbol size: {}x{}, {} errors corrected, {} erasures",
        grid.size.dim_x, grid.size.dim_y, grid.errors_corrected, grid.erasures
    );
    if let Some(url) = &output.gs1_url {
        eprintln!("GS1 Digital Link: {url}");
    }
    if let Some(quality) = &grid.quality {
        eprintln!("print quality grade: {}", quality.overall_grade());
    }

    ExitCode::SUCCESS
}
