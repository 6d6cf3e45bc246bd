//! Generate Rust record code from struct layout files.
//!
//! Usage:
//!   structgen [OPTIONS] [INPUT] [OUTPUT]
//!   structgen [OPTIONS] --dir <DIR> [--out-dir <DIR>]
//!   structgen [OPTIONS] < file.struct > file.rs
//!
//! INPUT and OUTPUT default to stdin/stdout (`-` also selects them). In directory mode every
//! `*.struct` file is converted into `<out-dir>/<stem>.rs`, dependencies first.
//!
//! Unknown member types are asked for on the terminal unless `--non-interactive` is given or
//! the struct itself is read from stdin; `--size Type=N` answers ahead of time.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use structgen::batch;
use structgen::{ConversionSession, PromptResolver, TableResolver, TypeCatalog, TypeResolver};

#[derive(Parser, Debug)]
#[command(name = "structgen")]
#[command(version)]
#[command(about = "Generate big-endian Rust record code from struct layout files", long_about = None)]
struct Args {
    /// Struct definition file (`-` or omitted: stdin)
    input: Option<PathBuf>,

    /// Generated source file (`-` or omitted: stdout)
    output: Option<PathBuf>,

    /// Convert every `*.struct` file in this directory
    #[arg(long, conflicts_with_all = ["input", "output"])]
    dir: Option<PathBuf>,

    /// Output directory for `--dir`
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Module path nested record types are imported from (e.g. `crate::hfs`)
    #[arg(short, long, default_value = "")]
    namespace: String,

    /// Size for an unknown type, `Type=N`; a negative N marks a record type
    #[arg(long = "size", value_name = "TYPE=N", value_parser = parse_size_arg)]
    sizes: Vec<(String, i64)>,

    /// JSON type catalog loaded before and saved after the run
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Never prompt for unknown type sizes
    #[arg(long)]
    non_interactive: bool,

    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn parse_size_arg(s: &str) -> Result<(String, i64), String> {
    let (name, size) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=N, got `{}`", s))?;
    let size: i64 = size
        .trim()
        .parse()
        .map_err(|e| format!("invalid size in `{}`: {}", s, e))?;
    if size == 0 {
        return Err(format!("size for `{}` must not be zero", name));
    }
    Ok((name.trim().to_string(), size))
}

fn is_stdio(path: &Option<PathBuf>) -> bool {
    path.as_deref().map_or(true, |p| p == Path::new("-"))
}

fn setup_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        "off" => log::LevelFilter::Off,
        _ => log::LevelFilter::Warn,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let interactive = !args.non_interactive && (args.dir.is_some() || !is_stdio(&args.input));
    if !interactive && !args.non_interactive {
        log::warn!("struct read from stdin: unknown types will not be prompted for");
    }
    let mut resolver = TableResolver::new();
    for (name, size) in &args.sizes {
        resolver.insert(name, *size);
    }
    if interactive {
        let prompt: Box<dyn TypeResolver> = Box::new(PromptResolver::stdio());
        resolver = resolver.or_else(prompt);
    }

    let catalog = match &args.catalog {
        Some(path) if path.exists() => TypeCatalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        _ => TypeCatalog::new(),
    };
    let mut session = ConversionSession::new(&args.namespace, Box::new(resolver)).with_catalog(catalog);

    if let Some(dir) = &args.dir {
        let written = batch::convert_dir(&mut session, dir, &args.out_dir)?;
        eprintln!("structgen: wrote {} file(s)", written.len());
    } else {
        let def = match args.input.as_deref() {
            Some(path) if path != Path::new("-") => {
                let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
                session
                    .read_struct(BufReader::new(file))
                    .with_context(|| format!("converting {}", path.display()))?
            }
            _ => session.read_struct(io::stdin().lock())?,
        };
        let text = session.render(&def);
        match args.output.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::write(path, &text)
                .with_context(|| format!("writing {}", path.display()))?,
            _ => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
        }
    }

    if let Some(path) = &args.catalog {
        session
            .catalog()
            .save(path)
            .with_context(|| format!("saving catalog {}", path.display()))?;
    }
    Ok(())
}
