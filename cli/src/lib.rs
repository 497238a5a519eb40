//! Rewrites an XML document with its attributes and namespace declarations in canonical order.

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

// -----------------------------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "tidyxml", version)]
#[command(about = "Sorts the attributes and namespace declarations of an XML document")]
pub struct Args {
    /// XML document to read
    pub input: PathBuf,

    /// File to write, may be the input itself
    pub output: PathBuf,

    /// Log more, can be repeated. RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// The log filter used when RUST_LOG is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }

        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

// -----------------------------------------------------------------------------------------------

pub fn run(args: &Args) -> anyhow::Result<()> {
    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let document = tidyxml_tree::parse(&bytes)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    info!(
        input = %args.input.display(),
        namespaces = document.namespaces().len(),
        "parsed document"
    );

    let canonical = tidyxml_writer::to_vec(&document)?;

    write_atomic(&args.output, &canonical)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), len = canonical.len(), "wrote document");

    Ok(())
}

/// Writes to a temporary file next to `path` and renames it over `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    debug!(temp = %file.path().display(), "writing temporary file");
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    Ok(())
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["tidyxml", "-vv", "in.xml", "out.xml"]).unwrap();
        assert_eq!(PathBuf::from("in.xml"), args.input);
        assert_eq!(PathBuf::from("out.xml"), args.output);
        assert_eq!("debug", args.log_filter());

        let args = Args::try_parse_from(["tidyxml", "-q", "in.xml", "out.xml"]).unwrap();
        assert_eq!("error", args.log_filter());

        let args = Args::try_parse_from(["tidyxml", "in.xml", "out.xml"]).unwrap();
        assert_eq!("warn", args.log_filter());
    }

    #[test]
    fn test_args_usage_error() {
        let err = Args::try_parse_from(["tidyxml", "in.xml"]).unwrap_err();
        assert_eq!(ErrorKind::MissingRequiredArgument, err.kind());
        assert_eq!(2, err.exit_code());

        let err = Args::try_parse_from(["tidyxml", "-v", "-q", "a", "b"]).unwrap_err();
        assert_eq!(ErrorKind::ArgumentConflict, err.kind());
    }
}
