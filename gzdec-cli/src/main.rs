//! gzdec CLI - decompress a gzip file.
//!
//! The whole payload is decompressed into memory and verified before a
//! single byte is written, so a failed run never leaves partial output.

mod summary;

use clap::Parser;
use gzdec::{CHUNK_SIZE, DecompressOptions, FileDecompressor, MAX_WINDOW_BITS};
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use summary::Summary;

#[derive(Parser, Debug)]
#[command(name = "gzdec")]
#[command(author, version, about = "Decompress a gzip file")]
#[command(long_about = "
Decompresses a single-member gzip file. The output is only written once the
stream has been fully decoded and its CRC-32 and length verified.

Examples:
  gzdec data.gz -o data.txt
  gzdec data.gz > data.txt
  gzdec data.gz -o data.txt --json
  RUST_LOG=trace gzdec data.gz -o data.txt
")]
struct Cli {
    /// Gzip file to decompress
    input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Size of the read and write chunks in bytes
    #[arg(long, default_value_t = CHUNK_SIZE)]
    chunk_size: usize,

    /// Base-two logarithm of the history window (8-15)
    #[arg(long, default_value_t = MAX_WINDOW_BITS)]
    window_bits: u8,

    /// Print a JSON summary (to stderr when the payload goes to stdout)
    #[arg(long)]
    json: bool,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> DecompressOptions {
        DecompressOptions::new()
            .with_chunk_size(self.chunk_size)
            .with_window_bits(self.window_bits)
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let decompressed = FileDecompressor::new(cli.options()).decompress_with_header(&cli.input)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &decompressed.data)?;
            info!(
                "wrote {} bytes to {}",
                decompressed.data.len(),
                path.display()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&decompressed.data)?;
            stdout.flush()?;
        }
    }

    if cli.json {
        let summary = Summary::new(&cli.input, cli.output.as_deref(), &decompressed);
        let json = serde_json::to_string_pretty(&summary)?;
        if cli.output.is_some() {
            println!("{}", json);
        } else {
            eprintln!("{}", json);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::ffi::OsStr;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["gzdec", "in.gz"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.gz"));
        assert!(cli.output.is_none());
        assert_eq!(cli.options(), DecompressOptions::default());
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "gzdec",
            "in.gz",
            "-o",
            "out.txt",
            "--chunk-size",
            "512",
            "--window-bits",
            "12",
            "--json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.options().chunk_size, 512);
        assert_eq!(cli.options().window_bits, 12);
        assert!(cli.json && cli.verbose);
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["gzdec"]).is_err());
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.gz");
        let output = dir.path().join("out.txt");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello from the cli").unwrap();
        fs::write(&input, encoder.finish().unwrap()).unwrap();

        let args: [&OsStr; 4] = ["gzdec".as_ref(), input.as_os_str(), "-o".as_ref(), output.as_os_str()];
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli).unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"hello from the cli");
    }

    #[test]
    fn test_run_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.gz");
        let output = dir.path().join("out.txt");
        fs::write(&input, b"\x1f\x8b\x08\x00not really gzip").unwrap();

        let args: [&OsStr; 4] = ["gzdec".as_ref(), input.as_os_str(), "-o".as_ref(), output.as_os_str()];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(run(&cli).is_err());
        assert!(!output.exists());
    }
}
