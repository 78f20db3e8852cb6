use std::{io::{self, BufRead}, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use rand::Rng;
use adaptive_prefix::{pipeline::{compress_to_files, read_source, SessionFiles}, storage::{FileSource, LineSource}};

#[derive(Parser, Debug)]
struct Args {
    /// Directory holding input.txt and receiving the code tables and the binary
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
    /// Seed of the initial table shuffle (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stdin = io::stdin();
    let mut stdin = stdin.lock();

    println!("Should the input be read from the file? (Y/N)");
    let mut choice = String::new();
    stdin.read_line(&mut choice).context("Failed reading the answer")?;

    let input = match choice.trim().to_uppercase().as_str() {
        "Y" => read_source(&mut FileSource::new(args.dir.join("input.txt"))),
        "N" => {
            println!("Enter the text to compress and decompress:");
            read_source(&mut LineSource::new(&mut stdin))
        }
        _ => None,
    };

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let files = SessionFiles::in_dir(&args.dir);

    let output = compress_to_files(input.as_deref(), seed, &files).context("Failed compressing the input")?;

    println!("Decompressed text: {}", output.decoded);
    println!("End text: {}", input.unwrap_or_default());
    println!("Whole encoded text: {}", output.stream);
    Ok(())
}
