//! JTON CLI - token-sparse JSON re-encoding tool
//!
//! This binary provides command-line access to the codec:
//! - pack: JSON -> token-sparse JSON
//! - unpack: token-sparse JSON -> original JSON

use clap::{Parser, Subcommand};
use jton_codec::{compress_json_with, decompress_json, EncodeOptions};
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jton")]
#[command(about = "Token-sparse JSON re-encoding tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-encode a JSON document into its token-sparse form
    Pack {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip base64 binary packs for human-readable output
        #[arg(long)]
        readable: bool,
    },
    /// Recover the original JSON document
    Unpack {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("jton: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Pack {
            input,
            output,
            readable,
        } => {
            let text = read_input(input.as_deref())?;
            let value: Value = serde_json::from_str(&text)?;
            let opts = if readable {
                EncodeOptions::readable()
            } else {
                EncodeOptions::default()
            };
            let packed = compress_json_with(&value, &opts)?;
            write_output(output.as_deref(), &packed)
        }
        Commands::Unpack { input, output } => {
            let text = read_input(input.as_deref())?;
            let value = decompress_json(&text)?;
            write_output(output.as_deref(), &serde_json::to_string(&value)?)
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String, Box<dyn Error>> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) => {
            fs::write(path, text)?;
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}
