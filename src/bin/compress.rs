use std::io;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use rand::Rng;
use adaptive_prefix::{pipeline::{compress_to_files, read_source, SessionFiles}, storage::{FileSource, LineSource, TextSource}};

#[derive(Parser, Debug)]
#[command(about = "Compress text with the adaptive prefix code, writing the packed stream and its code tables")]
struct Args {
    /// The destination basename
    dest_name: String,
    /// Read the input from this file instead of a line from stdin
    #[arg(short, long)]
    input: Option<String>,
    /// Seed of the initial table shuffle (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut source: Box<dyn TextSource> = match &args.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(LineSource::new(io::stdin().lock())),
    };
    let input = read_source(source.as_mut());

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let files = SessionFiles::for_basename(&args.dest_name);

    let output = compress_to_files(input.as_deref(), seed, &files)
        .with_context(|| format!("Failed compressing into {}", args.dest_name))?;

    info!("seed {}", seed);
    println!(
        "compressed {} symbols into {} bits ({} bytes) in {}ns",
        output.stats.symbols, output.stats.encoded_bits, output.stats.packed_bytes, output.stats.encode_ns
    );

    if !output.stats.verified {
        bail!("The decoded stream does not match the input");
    }
    Ok(())
}
