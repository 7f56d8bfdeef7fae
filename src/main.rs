use clap::{Parser, Subcommand};
use sharc::{Order, Sarc, DEFAULT_HASH_KEY};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sharc", about = "The SARC archive format CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a directory tree into a SARC archive
    Create {
        /// Directory to archive
        dir: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Byte order: little (default) or big
        #[arg(short, long, default_value = "little", value_parser = parse_order)]
        endian: Order,
        /// File-name hash key (accepts 0x-prefixed hex)
        #[arg(short = 'k', long, default_value_t = DEFAULT_HASH_KEY, value_parser = parse_key)]
        hash_key: u32,
    },
    /// Extract a SARC archive
    Extract {
        input: PathBuf,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// List archive contents
    List {
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {

        // ── Create ───────────────────────────────────────────────────────────
        Commands::Create { dir, output, endian, hash_key } => {
            let sarc = Sarc::from_dir(&dir, endian, hash_key)?;
            for (_, path) in sarc.entries() {
                println!("  packed  {}", path?);
            }
            let build = sarc.build()?;
            if build.over_capacity {
                eprintln!("WARNING: file entries exceed the format maximum of 0x3fff");
            }
            std::fs::write(&output, &build.bytes)?;
            println!("Created: {} ({} files, {} bytes)",
                     output.display(), sarc.len(), build.bytes.len());
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { input, output_dir } => {
            let sarc = Sarc::load(&input)?;
            for (hash, result) in sarc.extract_all() {
                match result {
                    Ok((path, data)) => {
                        let out_path = output_dir.join(&path);
                        if let Some(parent) = out_path.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(&out_path, data)?;
                        println!("  extracted  {}", path);
                    }
                    Err(e) => eprintln!("  skipped    {hash:08X}: {e}"),
                }
            }
            println!("Extracted to: {}", output_dir.display());
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input } => {
            let sarc = Sarc::load(&input)?;
            for (hash, path) in sarc.entries() {
                match path {
                    Ok(path) => println!("Hash: {hash:08X}  Path: {path}"),
                    Err(e) => eprintln!("Hash: {hash:08X}  <unreadable name: {e}>"),
                }
            }
            println!("{} file(s), hash key {:#x}", sarc.len(), sarc.hash_key());
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn parse_order(s: &str) -> Result<Order, String> {
    match s {
        "big" => Ok(Order::Big),
        "little" => Ok(Order::Little),
        other => Err(format!("unknown byte order '{other}', expected 'big' or 'little'")),
    }
}

fn parse_key(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid hash key '{s}': {e}"))
}
