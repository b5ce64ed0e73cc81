//! propdir - print the properties of a metadata record
//!
//! Reads a metadata directory (or a record addressed by uid inside a
//! datastore root) and prints every property, or the requested ones.

use anyhow::{Context, Result};
use clap::Parser;
use propdir::cli::{Args, OutputFormat, Target};
use propdir::{HostAdapter, JsonEncoder, PropertyReader, TextEncoder, ValueEncoder};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    // Logs go to stderr so stdout only carries properties
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    let reader = PropertyReader::new(args.reader.to_config());
    let dir = resolve_directory(&args)?;
    tracing::info!("Reading properties from {}", dir.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.output.format {
        OutputFormat::Text => {
            let props = retrieve(&args, &dir, reader, TextEncoder)?;
            for (name, value) in sorted(props) {
                writeln!(out, "{name}: {value}")?;
            }
        }
        OutputFormat::Json => {
            let props = retrieve(&args, &dir, reader, JsonEncoder)?;
            serde_json::to_writer_pretty(&mut out, &sorted(props))?;
            writeln!(out)?;
        }
    }

    Ok(())
}

fn resolve_directory(args: &Args) -> Result<PathBuf> {
    match args.target()? {
        Target::Directory(dir) => Ok(dir),
        Target::Record { layout, uid } => layout
            .metadata_path(&uid)
            .with_context(|| format!("Invalid record uid {uid:?}")),
    }
}

fn retrieve<E: ValueEncoder>(
    args: &Args,
    dir: &std::path::Path,
    reader: PropertyReader,
    encoder: E,
) -> Result<HashMap<String, E::Value>> {
    let adapter = HostAdapter::new(reader, encoder);
    adapter
        .retrieve(dir, args.requested())
        .with_context(|| format!("Failed to read properties from {}", dir.display()))
}

fn sorted<V>(props: HashMap<String, V>) -> BTreeMap<String, V> {
    props.into_iter().collect()
}
