use std::{fs, time::Instant};

use anyhow::Context;
use clap::Parser;
use adaptive_prefix::pipeline::decompress_from_files;

#[derive(Parser, Debug)]
#[command(about = "Decompress a binary produced by `compress`, using its properties and final code table")]
struct Args {
    /// The basename of the compressed files
    source_name: String,
    /// The destination text file
    dest_name: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let properties = format!("{}.properties", args.source_name);

    let decomp_time = Instant::now();
    let text = decompress_from_files(&properties)
        .with_context(|| format!("Failed decompressing {}", args.source_name))?;
    let decomp_time = decomp_time.elapsed().as_nanos();

    fs::write(&args.dest_name, &text).with_context(|| format!("Could not write {}", args.dest_name))?;
    println!("decompressed {} symbols in {}ns", text.chars().count(), decomp_time);
    Ok(())
}
